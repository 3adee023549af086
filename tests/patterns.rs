//! Pattern field behaviour: choice exclusivity, defaults, bit-width ranges, counter expansion.

use otgmodel::patterns::{
    PatternFlowEthernetDst, PatternFlowEthernetEtherType, PatternFlowIpv4Src,
    PatternFlowIpv4TimeToLive, PatternFlowIpv6Dst, PatternFlowSnmpv2cRequestId,
    PatternFlowSnmpv2cVariableBindingObjectIdentifier,
};
use otgmodel::{Counter, ObjectNode, PatternChoice, PatternState};

otgmodel::pattern_kind! {
    /// Signed 8-bit field.
    PatternSigned8(Signed8Kind) {
        value: i32 = 0,
        format: Int(8),
        default_choice: Value,
    }
}

fn errors<T: ObjectNode>(node: &T) -> Vec<String> {
    match node.validate() {
        Ok(_) => Vec::new(),
        Err(e) => e.messages,
    }
}

#[test]
fn test_each_setter_selects_its_choice() {
    let mut p = PatternFlowEthernetEtherType::new();
    p.set_value(0x0800);
    assert_eq!(p.choice(), Some(PatternChoice::Value));
    p.set_values(vec![0x0800, 0x86dd]);
    assert_eq!(p.choice(), Some(PatternChoice::Values));
    assert!(p.value().is_none());
    p.set_auto(65535);
    assert_eq!(p.choice(), Some(PatternChoice::Auto));
    assert!(p.values().is_none());
    p.set_increment(Counter::new());
    assert_eq!(p.choice(), Some(PatternChoice::Increment));
    assert!(p.auto().is_none());
    p.set_decrement(Counter::new());
    assert_eq!(p.choice(), Some(PatternChoice::Decrement));
    assert!(p.increment().is_none());
    assert!(matches!(p.state(), Some(PatternState::Decrement(_))));
}

#[test]
fn test_auto_only_where_declared() {
    let mut ttl = PatternFlowIpv4TimeToLive::new();
    ttl.set_auto(1);
    assert_eq!(ttl.choice(), Some(PatternChoice::Value));
    assert_eq!(
        errors(&ttl),
        ["auto is not a valid choice on PatternFlowIpv4TimeToLiveChoiceEnum"]
    );

    let mut dst = PatternFlowEthernetDst::new();
    dst.set_value("00:00:00:00:00:01".to_string());
    assert_eq!(
        dst.auto_or_default().map(String::as_str),
        Some("00:00:00:00:00:00")
    );
    assert_eq!(dst.choice(), Some(PatternChoice::Auto));
}

#[test]
fn test_rejected_setter_does_not_outlive_next_setter() {
    let mut ttl = PatternFlowIpv4TimeToLive::new();
    ttl.set_auto(1);
    ttl.set_value(5);
    assert!(errors(&ttl).is_empty());
    let json = ttl.to_json().expect("to_json");
    assert!(json.contains("\"value\": 5"), "{}", json);

    let mut oid = PatternFlowSnmpv2cVariableBindingObjectIdentifier::new();
    oid.set_increment(Counter::new());
    oid.values_or_default().push("1.3.6.1".to_string());
    assert!(errors(&oid).is_empty());
}

#[test]
fn test_counter_defaults() {
    let mut ttl = PatternFlowIpv4TimeToLive::default();
    ttl.set_increment(Counter::new());
    ttl.set_default();
    let c = ttl.increment().expect("increment");
    assert_eq!((c.start(), c.step(), c.count()), (Some(&64), Some(&1), Some(1)));

    let mut id = PatternFlowSnmpv2cRequestId::default();
    id.set_decrement(Counter::new());
    id.set_default();
    let c = id.decrement().expect("decrement");
    assert_eq!((c.start(), c.step(), c.count()), (Some(&0), Some(&1), Some(1)));

    let mut v6 = PatternFlowIpv6Dst::new();
    let c = v6.increment_or_default().expect("increment");
    assert_eq!(c.start().map(String::as_str), Some("::0"));
    assert_eq!(c.step().map(String::as_str), Some("::1"));
    assert_eq!(c.count(), Some(1));
}

#[test]
fn test_unsigned_8_bit_boundaries() {
    let mut ttl = PatternFlowIpv4TimeToLive::new();
    for ok in [0, 255] {
        ttl.set_value(ok);
        assert!(errors(&ttl).is_empty(), "{} should be accepted", ok);
    }
    ttl.set_value(256);
    assert_eq!(
        errors(&ttl),
        ["min 0 max 255 but got 256 on PatternFlowIpv4TimeToLive.value"]
    );
}

#[test]
fn test_signed_8_bit_boundaries() {
    let mut p = PatternSigned8::new();
    for ok in [-128, 127] {
        p.set_value(ok);
        assert!(errors(&p).is_empty(), "{} should be accepted", ok);
    }
    p.set_value(-129);
    assert_eq!(errors(&p), ["min -128 max 127 but got -129 on PatternSigned8.value"]);
    p.set_value(128);
    assert_eq!(errors(&p), ["min -128 max 127 but got 128 on PatternSigned8.value"]);
}

#[test]
fn test_list_reports_every_bad_element() {
    let mut src = PatternFlowIpv4Src::new();
    src.set_values(vec![
        "1.1.1.1".to_string(),
        "1.1.1".to_string(),
        "2.2.2.2".to_string(),
        "300.1.1.1".to_string(),
    ]);
    let errs = errors(&src);
    assert_eq!(errs.len(), 2);
    assert!(errs[0].ends_with("on PatternFlowIpv4Src.values[1]"));
    assert!(errs[1].ends_with("on PatternFlowIpv4Src.values[3]"));
}

#[test]
fn test_default_on_read() {
    let mut src = PatternFlowIpv4Src::default();
    assert_eq!(src.choice(), None);
    assert!(src.value().is_none());
    assert_eq!(src.choice(), None);
    assert_eq!(src.value_or_default(), "0.0.0.0");
    assert_eq!(src.choice(), Some(PatternChoice::Value));

    src.values_or_default().push("10.0.0.1".to_string());
    assert_eq!(
        src.values(),
        Some(&["0.0.0.0".to_string(), "10.0.0.1".to_string()][..])
    );
}

#[test]
fn test_oid_rejects_counters() {
    let mut oid = PatternFlowSnmpv2cVariableBindingObjectIdentifier::new();
    oid.set_value("1.3.6.x".to_string());
    oid.set_decrement(Counter::new());
    assert_eq!(oid.choice(), Some(PatternChoice::Value));
    let errs = errors(&oid);
    assert_eq!(
        errs,
        [
            "decrement is not a valid choice on PatternFlowSnmpv2cVariableBindingObjectIdentifierChoiceEnum",
            "Invalid oid value 1.3.6.x on PatternFlowSnmpv2cVariableBindingObjectIdentifier.value",
        ]
    );
}

#[test]
fn test_ipv4_counter_carries_across_octets() {
    let mut src = PatternFlowIpv4Src::new();
    src.increment_or_default()
        .expect("increment")
        .set_start("10.0.0.254".to_string())
        .set_count(3);
    assert_eq!(
        src.expand(),
        Some(vec![
            "10.0.0.254".to_string(),
            "10.0.0.255".to_string(),
            "10.0.1.0".to_string(),
        ])
    );
}

#[test]
fn test_ttl_counter_wraps_at_width() {
    let mut ttl = PatternFlowIpv4TimeToLive::new();
    ttl.decrement_or_default()
        .expect("decrement")
        .set_start(1)
        .set_step(1)
        .set_count(3);
    assert_eq!(ttl.expand(), Some(vec![1, 0, 255]));
}

#[test]
fn test_decoded_mixed_record_is_reported() {
    let record = otgmodel::msg::PatternUint {
        choice: Some(PatternChoice::Value.into()),
        values: vec![1, 2],
        ..Default::default()
    };
    let ttl = PatternFlowIpv4TimeToLive::from_msg(record);
    assert_eq!(ttl.choice(), Some(PatternChoice::Value));
    assert_eq!(ttl.value(), Some(&64));
    assert_eq!(
        errors(&ttl),
        ["choice not matching with property in PatternFlowIpv4TimeToLive"]
    );

    let inferred = PatternFlowIpv4TimeToLive::from_json(r#"{"values": [3, 4]}"#).expect("infer");
    assert_eq!(inferred.values(), Some(&[3, 4][..]));
}
