//! Pattern kinds for every header field of the schema.

use crate::pattern_kind;

pattern_kind! {
    /// Destination MAC address.
    PatternFlowEthernetDst(FlowEthernetDstKind) {
        value: String = "00:00:00:00:00:00",
        format: Mac,
        default_choice: Auto,
        auto: "00:00:00:00:00:00",
    }
}

pattern_kind! {
    /// Source MAC address.
    PatternFlowEthernetSrc(FlowEthernetSrcKind) {
        value: String = "00:00:00:00:00:00",
        format: Mac,
        default_choice: Value,
    }
}

pattern_kind! {
    /// Ethernet type. `auto` follows the next header.
    PatternFlowEthernetEtherType(FlowEthernetEtherTypeKind) {
        value: u32 = 65535,
        format: Uint(16),
        default_choice: Auto,
        auto: 65535,
    }
}

pattern_kind! {
    /// Priority flow control queue.
    PatternFlowEthernetPfcQueue(FlowEthernetPfcQueueKind) {
        value: u32 = 0,
        format: Uint(3),
        default_choice: Value,
    }
}

pattern_kind! {
    /// Priority code point.
    PatternFlowVlanPriority(FlowVlanPriorityKind) {
        value: u32 = 0,
        format: Uint(3),
        default_choice: Value,
    }
}

pattern_kind! {
    /// Canonical format indicator.
    PatternFlowVlanCfi(FlowVlanCfiKind) {
        value: u32 = 0,
        format: Uint(1),
        default_choice: Value,
    }
}

pattern_kind! {
    /// VLAN identifier.
    PatternFlowVlanId(FlowVlanIdKind) {
        value: u32 = 0,
        format: Uint(12),
        default_choice: Value,
    }
}

pattern_kind! {
    /// Protocol identifier.
    PatternFlowVlanTpid(FlowVlanTpidKind) {
        value: u32 = 33024,
        format: Uint(16),
        default_choice: Value,
    }
}

pattern_kind! {
    PatternFlowIpv4Version(FlowIpv4VersionKind) {
        value: u32 = 4,
        format: Uint(4),
        default_choice: Value,
    }
}

pattern_kind! {
    /// Header length in 32-bit words. `auto` is computed from the options.
    PatternFlowIpv4HeaderLength(FlowIpv4HeaderLengthKind) {
        value: u32 = 5,
        format: Uint(4),
        default_choice: Auto,
        auto: 5,
    }
}

pattern_kind! {
    PatternFlowIpv4TimeToLive(FlowIpv4TimeToLiveKind) {
        value: u32 = 64,
        format: Uint(8),
        default_choice: Value,
    }
}

pattern_kind! {
    /// Protocol number. `auto` follows the next header.
    PatternFlowIpv4Protocol(FlowIpv4ProtocolKind) {
        value: u32 = 61,
        format: Uint(8),
        default_choice: Auto,
        auto: 61,
    }
}

pattern_kind! {
    PatternFlowIpv4Src(FlowIpv4SrcKind) {
        value: String = "0.0.0.0",
        format: Ipv4,
        default_choice: Value,
    }
}

pattern_kind! {
    PatternFlowIpv4Dst(FlowIpv4DstKind) {
        value: String = "0.0.0.0",
        format: Ipv4,
        default_choice: Value,
    }
}

pattern_kind! {
    PatternFlowIpv6Version(FlowIpv6VersionKind) {
        value: u32 = 6,
        format: Uint(4),
        default_choice: Value,
    }
}

pattern_kind! {
    PatternFlowIpv6FlowLabel(FlowIpv6FlowLabelKind) {
        value: u32 = 0,
        format: Uint(20),
        default_choice: Value,
    }
}

pattern_kind! {
    PatternFlowIpv6HopLimit(FlowIpv6HopLimitKind) {
        value: u32 = 64,
        format: Uint(8),
        default_choice: Value,
    }
}

pattern_kind! {
    PatternFlowIpv6Src(FlowIpv6SrcKind) {
        value: String = "::0",
        format: Ipv6,
        default_choice: Value,
    }
}

pattern_kind! {
    PatternFlowIpv6Dst(FlowIpv6DstKind) {
        value: String = "::0",
        format: Ipv6,
        default_choice: Value,
    }
}

pattern_kind! {
    /// SNMP version; 1 is v2c.
    PatternFlowSnmpv2cVersion(FlowSnmpv2cVersionKind) {
        value: u32 = 1,
        format: Uint(8),
        default_choice: Value,
    }
}

pattern_kind! {
    PatternFlowSnmpv2cRequestId(FlowSnmpv2cRequestIdKind) {
        value: i32 = 0,
        format: Int(32),
        default_choice: Value,
    }
}

pattern_kind! {
    /// Object identifier of a variable binding.
    PatternFlowSnmpv2cVariableBindingObjectIdentifier(FlowSnmpv2cVariableBindingObjectIdentifierKind) {
        value: String = "0.1",
        format: Oid,
        default_choice: Value,
    }
}

pattern_kind! {
    PatternFlowSnmpv2cVariableBindingIntegerValue(FlowSnmpv2cVariableBindingIntegerValueKind) {
        value: i32 = 0,
        format: Int(32),
        default_choice: Value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg::PatternChoice;
    use crate::node::ObjectNode;

    #[test]
    fn mac_and_auto_fields_default_to_auto() {
        assert_eq!(PatternFlowEthernetDst::new().choice(), Some(PatternChoice::Auto));
        assert_eq!(PatternFlowEthernetSrc::new().choice(), Some(PatternChoice::Value));
        assert_eq!(PatternFlowIpv4Protocol::new().auto(), Some(&61));
        assert_eq!(PatternFlowIpv4Src::new().value().map(String::as_str), Some("0.0.0.0"));
    }

    #[test]
    fn oid_has_no_counters() {
        let mut p = PatternFlowSnmpv2cVariableBindingObjectIdentifier::new();
        assert!(p.increment_or_default().is_none());
        assert_eq!(p.choice(), Some(PatternChoice::Value));
        let err = p.validate().unwrap_err();
        assert_eq!(
            err.messages,
            ["increment is not a valid choice on PatternFlowSnmpv2cVariableBindingObjectIdentifierChoiceEnum"]
        );
    }

    #[test]
    fn ipv4_counter_defaults() {
        let mut p = PatternFlowIpv4Dst::new();
        p.set_increment(crate::pattern::Counter::new());
        p.set_default();
        let c = p.increment().unwrap();
        assert_eq!(c.start().map(String::as_str), Some("0.0.0.0"));
        assert_eq!(c.step().map(String::as_str), Some("0.0.0.1"));
        assert_eq!(c.count(), Some(1));
    }
}
