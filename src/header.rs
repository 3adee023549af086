//! Packet headers of a flow: the `FlowHeader` choice and one node per protocol.

use crate::msg::{self, FlowHeaderChoice, NamedEnum};
use crate::node::{known_tag, resolve_choice, NodeList, ObjectNode};
use crate::patterns::*;
use crate::validation::Validation;

const COMMUNITY_DEFAULT: &str = "community";
const COMMUNITY_MAX_LEN: usize = 10000;

/// Header node whose fields are all optional patterns. Unset patterns stay unset through
/// defaulting; `<field>_mut` creates one with its kind defaults.
macro_rules! pattern_node {
    (
        $(#[$m:meta])*
        $name:ident => $record:ident {
            $($field:ident, $field_mut:ident, $set:ident: $ty:ty;)+
        }
        $(deprecated $dep:ident: $note:literal)?
    ) => {
        $(#[$m])*
        #[derive(Debug, Default, PartialEq)]
        pub struct $name {
            $($field: Option<$ty>,)+
        }

        impl $name {
            pub fn new() -> Self {
                let mut obj = Self::default();
                obj.set_default();
                obj
            }

            $(
                pub fn $field(&self) -> Option<&$ty> {
                    self.$field.as_ref()
                }

                pub fn $field_mut(&mut self) -> &mut $ty {
                    self.$field.get_or_insert_with(<$ty>::new)
                }

                pub fn $set(&mut self, v: $ty) -> &mut Self {
                    self.$field = Some(v);
                    self
                }
            )+
        }

        impl ObjectNode for $name {
            type Msg = msg::$record;
            const TYPE_NAME: &'static str = stringify!($name);

            fn to_msg(&self) -> msg::$record {
                msg::$record {
                    $($field: self.$field.as_ref().map(ObjectNode::to_msg),)+
                }
            }

            fn set_msg(&mut self, msg: msg::$record) -> &mut Self {
                *self = $name {
                    $($field: msg.$field.map(<$ty>::from_msg),)+
                };
                self
            }

            fn set_default(&mut self) {
                $(
                    if let Some(p) = &mut self.$field {
                        p.set_default();
                    }
                )+
            }

            fn validate_obj(&self, vobj: &mut Validation) {
                $(
                    if self.$dep.is_some() {
                        vobj.deprecated(stringify!($dep), stringify!($name), $note);
                    }
                )?
                $(
                    if let Some(p) = &self.$field {
                        p.validate_obj(vobj);
                    }
                )+
            }
        }
    };
}

pattern_node! {
    /// Ethernet II header.
    FlowEthernet => FlowEthernet {
        dst, dst_mut, set_dst: PatternFlowEthernetDst;
        src, src_mut, set_src: PatternFlowEthernetSrc;
        ether_type, ether_type_mut, set_ether_type: PatternFlowEthernetEtherType;
        pfc_queue, pfc_queue_mut, set_pfc_queue: PatternFlowEthernetPfcQueue;
    }
    deprecated pfc_queue: "use the priority flow control header instead"
}

pattern_node! {
    /// 802.1Q tag.
    FlowVlan => FlowVlan {
        priority, priority_mut, set_priority: PatternFlowVlanPriority;
        cfi, cfi_mut, set_cfi: PatternFlowVlanCfi;
        id, id_mut, set_id: PatternFlowVlanId;
        tpid, tpid_mut, set_tpid: PatternFlowVlanTpid;
    }
}

pattern_node! {
    FlowIpv4 => FlowIpv4 {
        version, version_mut, set_version: PatternFlowIpv4Version;
        header_length, header_length_mut, set_header_length: PatternFlowIpv4HeaderLength;
        time_to_live, time_to_live_mut, set_time_to_live: PatternFlowIpv4TimeToLive;
        protocol, protocol_mut, set_protocol: PatternFlowIpv4Protocol;
        src, src_mut, set_src: PatternFlowIpv4Src;
        dst, dst_mut, set_dst: PatternFlowIpv4Dst;
    }
}

pattern_node! {
    FlowIpv6 => FlowIpv6 {
        version, version_mut, set_version: PatternFlowIpv6Version;
        flow_label, flow_label_mut, set_flow_label: PatternFlowIpv6FlowLabel;
        hop_limit, hop_limit_mut, set_hop_limit: PatternFlowIpv6HopLimit;
        src, src_mut, set_src: PatternFlowIpv6Src;
        dst, dst_mut, set_dst: PatternFlowIpv6Dst;
    }
}

pattern_node! {
    /// One `object_identifier = integer_value` binding of an SNMP PDU.
    FlowSnmpv2cVariableBinding => FlowSnmpv2cVariableBinding {
        object_identifier, object_identifier_mut, set_object_identifier:
            PatternFlowSnmpv2cVariableBindingObjectIdentifier;
        integer_value, integer_value_mut, set_integer_value:
            PatternFlowSnmpv2cVariableBindingIntegerValue;
    }
}

/// SNMPv2c message.
#[derive(Debug, Default, PartialEq)]
pub struct FlowSnmpv2c {
    version: Option<PatternFlowSnmpv2cVersion>,
    community: Option<String>,
    request_id: Option<PatternFlowSnmpv2cRequestId>,
    variable_bindings: NodeList<FlowSnmpv2cVariableBinding>,
}

impl FlowSnmpv2c {
    pub fn new() -> Self {
        let mut obj = Self::default();
        obj.set_default();
        obj
    }

    pub fn version(&self) -> Option<&PatternFlowSnmpv2cVersion> {
        self.version.as_ref()
    }

    pub fn version_mut(&mut self) -> &mut PatternFlowSnmpv2cVersion {
        self.version.get_or_insert_with(PatternFlowSnmpv2cVersion::new)
    }

    pub fn community(&self) -> Option<&str> {
        self.community.as_deref()
    }

    pub fn set_community(&mut self, v: impl Into<String>) -> &mut Self {
        self.community = Some(v.into());
        self
    }

    pub fn request_id(&self) -> Option<&PatternFlowSnmpv2cRequestId> {
        self.request_id.as_ref()
    }

    pub fn request_id_mut(&mut self) -> &mut PatternFlowSnmpv2cRequestId {
        self.request_id.get_or_insert_with(PatternFlowSnmpv2cRequestId::new)
    }

    pub fn variable_bindings(&self) -> &NodeList<FlowSnmpv2cVariableBinding> {
        &self.variable_bindings
    }

    pub fn variable_bindings_mut(&mut self) -> &mut NodeList<FlowSnmpv2cVariableBinding> {
        &mut self.variable_bindings
    }
}

impl ObjectNode for FlowSnmpv2c {
    type Msg = msg::FlowSnmpv2c;
    const TYPE_NAME: &'static str = "FlowSnmpv2c";

    fn to_msg(&self) -> msg::FlowSnmpv2c {
        msg::FlowSnmpv2c {
            version: self.version.as_ref().map(ObjectNode::to_msg),
            community: self.community.clone(),
            request_id: self.request_id.as_ref().map(ObjectNode::to_msg),
            variable_bindings: self.variable_bindings.to_msgs(),
        }
    }

    fn set_msg(&mut self, msg: msg::FlowSnmpv2c) -> &mut Self {
        *self = FlowSnmpv2c {
            version: msg.version.map(PatternFlowSnmpv2cVersion::from_msg),
            community: msg.community,
            request_id: msg.request_id.map(PatternFlowSnmpv2cRequestId::from_msg),
            variable_bindings: NodeList::from_msgs(msg.variable_bindings),
        };
        self
    }

    fn set_default(&mut self) {
        if self.community.is_none() {
            self.community = Some(COMMUNITY_DEFAULT.to_string());
        }
        if let Some(p) = &mut self.version {
            p.set_default();
        }
        if let Some(p) = &mut self.request_id {
            p.set_default();
        }
        self.variable_bindings.set_default();
    }

    fn validate_obj(&self, vobj: &mut Validation) {
        if let Some(p) = &self.version {
            p.validate_obj(vobj);
        }
        if let Some(c) = &self.community {
            if c.len() > COMMUNITY_MAX_LEN {
                vobj.error_at(
                    format!("max length {} but got {}", COMMUNITY_MAX_LEN, c.len()),
                    Self::TYPE_NAME,
                    "community",
                );
            }
        }
        if let Some(p) = &self.request_id {
            p.validate_obj(vobj);
        }
        self.variable_bindings.validate_obj(vobj);
    }
}

/// Active header of a [`FlowHeader`].
#[derive(Debug, PartialEq)]
pub enum FlowHeaderVariant {
    Ethernet(FlowEthernet),
    Vlan(FlowVlan),
    Ipv4(FlowIpv4),
    Ipv6(FlowIpv6),
    Snmpv2c(FlowSnmpv2c),
}

impl FlowHeaderVariant {
    pub fn choice(&self) -> FlowHeaderChoice {
        match self {
            FlowHeaderVariant::Ethernet(_) => FlowHeaderChoice::Ethernet,
            FlowHeaderVariant::Vlan(_) => FlowHeaderChoice::Vlan,
            FlowHeaderVariant::Ipv4(_) => FlowHeaderChoice::Ipv4,
            FlowHeaderVariant::Ipv6(_) => FlowHeaderChoice::Ipv6,
            FlowHeaderVariant::Snmpv2c(_) => FlowHeaderChoice::Snmpv2c,
        }
    }

    fn with_defaults(choice: FlowHeaderChoice) -> Option<Self> {
        Some(match choice {
            FlowHeaderChoice::Ethernet => FlowHeaderVariant::Ethernet(FlowEthernet::new()),
            FlowHeaderChoice::Vlan => FlowHeaderVariant::Vlan(FlowVlan::new()),
            FlowHeaderChoice::Ipv4 => FlowHeaderVariant::Ipv4(FlowIpv4::new()),
            FlowHeaderChoice::Ipv6 => FlowHeaderVariant::Ipv6(FlowIpv6::new()),
            FlowHeaderChoice::Snmpv2c => FlowHeaderVariant::Snmpv2c(FlowSnmpv2c::new()),
            FlowHeaderChoice::Unspecified => return None,
        })
    }
}

/// One header of a flow's packet. Defaults to Ethernet.
#[derive(Debug, Default, PartialEq)]
pub struct FlowHeader {
    variant: Option<FlowHeaderVariant>,
    issues: Vec<String>,
}

macro_rules! header_accessors {
    ($($variant:ident, $get:ident, $get_mut:ident, $set:ident: $ty:ty;)+) => {
        $(
            pub fn $get(&self) -> Option<&$ty> {
                match &self.variant {
                    Some(FlowHeaderVariant::$variant(h)) => Some(h),
                    _ => None,
                }
            }

            /// Select this header if it is not active and return it.
            pub fn $get_mut(&mut self) -> &mut $ty {
                if !matches!(self.variant, Some(FlowHeaderVariant::$variant(_))) {
                    self.replace(FlowHeaderVariant::$variant(<$ty>::new()));
                }
                match &mut self.variant {
                    Some(FlowHeaderVariant::$variant(h)) => h,
                    _ => unreachable!("header was just selected"),
                }
            }

            pub fn $set(&mut self, h: $ty) -> &mut Self {
                self.replace(FlowHeaderVariant::$variant(h));
                self
            }
        )+
    };
}

impl FlowHeader {
    pub fn new() -> Self {
        let mut obj = Self::default();
        obj.set_default();
        obj
    }

    pub fn choice(&self) -> Option<FlowHeaderChoice> {
        self.variant.as_ref().map(FlowHeaderVariant::choice)
    }

    pub fn variant(&self) -> Option<&FlowHeaderVariant> {
        self.variant.as_ref()
    }

    fn replace(&mut self, variant: FlowHeaderVariant) {
        self.variant = Some(variant);
        self.issues.clear();
    }

    /// Select `choice` with a defaulted header. Re-selecting the active choice keeps it.
    pub fn set_choice(&mut self, choice: FlowHeaderChoice) -> &mut Self {
        if self.choice() == Some(choice) {
            self.issues.clear();
            return self;
        }
        match FlowHeaderVariant::with_defaults(choice) {
            Some(v) => self.replace(v),
            None => self.issues.push(format!(
                "{} is not a valid choice on {}ChoiceEnum",
                choice.name(),
                Self::TYPE_NAME
            )),
        }
        self
    }

    header_accessors! {
        Ethernet, ethernet, ethernet_mut, set_ethernet: FlowEthernet;
        Vlan, vlan, vlan_mut, set_vlan: FlowVlan;
        Ipv4, ipv4, ipv4_mut, set_ipv4: FlowIpv4;
        Ipv6, ipv6, ipv6_mut, set_ipv6: FlowIpv6;
        Snmpv2c, snmpv2c, snmpv2c_mut, set_snmpv2c: FlowSnmpv2c;
    }
}

impl ObjectNode for FlowHeader {
    type Msg = msg::FlowHeader;
    const TYPE_NAME: &'static str = "FlowHeader";

    fn to_msg(&self) -> msg::FlowHeader {
        let mut m = msg::FlowHeader {
            choice: self.choice().map(Into::into),
            ..Default::default()
        };
        match &self.variant {
            Some(FlowHeaderVariant::Ethernet(h)) => m.ethernet = Some(h.to_msg()),
            Some(FlowHeaderVariant::Vlan(h)) => m.vlan = Some(h.to_msg()),
            Some(FlowHeaderVariant::Ipv4(h)) => m.ipv4 = Some(h.to_msg()),
            Some(FlowHeaderVariant::Ipv6(h)) => m.ipv6 = Some(h.to_msg()),
            Some(FlowHeaderVariant::Snmpv2c(h)) => m.snmpv2c = Some(h.to_msg()),
            None => {}
        }
        m
    }

    fn set_msg(&mut self, msg: msg::FlowHeader) -> &mut Self {
        *self = FlowHeader::default();
        let tag = known_tag::<FlowHeaderChoice>(msg.choice, Self::TYPE_NAME, &mut self.issues);
        let populated: Vec<FlowHeaderChoice> = [
            (msg.ethernet.is_some(), FlowHeaderChoice::Ethernet),
            (msg.vlan.is_some(), FlowHeaderChoice::Vlan),
            (msg.ipv4.is_some(), FlowHeaderChoice::Ipv4),
            (msg.ipv6.is_some(), FlowHeaderChoice::Ipv6),
            (msg.snmpv2c.is_some(), FlowHeaderChoice::Snmpv2c),
        ]
        .into_iter()
        .filter_map(|(set, c)| set.then_some(c))
        .collect();
        let choice = match resolve_choice(tag, &populated, Self::TYPE_NAME, &mut self.issues) {
            Some(c) => c,
            None => return self,
        };
        self.variant = match choice {
            FlowHeaderChoice::Ethernet => msg.ethernet.map(|m| FlowHeaderVariant::Ethernet(FlowEthernet::from_msg(m))),
            FlowHeaderChoice::Vlan => msg.vlan.map(|m| FlowHeaderVariant::Vlan(FlowVlan::from_msg(m))),
            FlowHeaderChoice::Ipv4 => msg.ipv4.map(|m| FlowHeaderVariant::Ipv4(FlowIpv4::from_msg(m))),
            FlowHeaderChoice::Ipv6 => msg.ipv6.map(|m| FlowHeaderVariant::Ipv6(FlowIpv6::from_msg(m))),
            FlowHeaderChoice::Snmpv2c => msg.snmpv2c.map(|m| FlowHeaderVariant::Snmpv2c(FlowSnmpv2c::from_msg(m))),
            FlowHeaderChoice::Unspecified => None,
        }
        .or_else(|| FlowHeaderVariant::with_defaults(choice));
        self
    }

    fn set_default(&mut self) {
        if self.variant.is_none() {
            self.variant = FlowHeaderVariant::with_defaults(FlowHeaderChoice::Ethernet);
        }
        match &mut self.variant {
            Some(FlowHeaderVariant::Ethernet(h)) => h.set_default(),
            Some(FlowHeaderVariant::Vlan(h)) => h.set_default(),
            Some(FlowHeaderVariant::Ipv4(h)) => h.set_default(),
            Some(FlowHeaderVariant::Ipv6(h)) => h.set_default(),
            Some(FlowHeaderVariant::Snmpv2c(h)) => h.set_default(),
            None => {}
        }
    }

    fn validate_obj(&self, vobj: &mut Validation) {
        for issue in &self.issues {
            vobj.error(issue.clone());
        }
        match &self.variant {
            Some(FlowHeaderVariant::Ethernet(h)) => h.validate_obj(vobj),
            Some(FlowHeaderVariant::Vlan(h)) => h.validate_obj(vobj),
            Some(FlowHeaderVariant::Ipv4(h)) => h.validate_obj(vobj),
            Some(FlowHeaderVariant::Ipv6(h)) => h.validate_obj(vobj),
            Some(FlowHeaderVariant::Snmpv2c(h)) => h.validate_obj(vobj),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg::PatternChoice;

    #[test]
    fn header_defaults_to_ethernet() {
        let h = FlowHeader::new();
        assert_eq!(h.choice(), Some(FlowHeaderChoice::Ethernet));
        assert!(h.ethernet().is_some());
        assert!(h.ipv4().is_none());
    }

    #[test]
    fn selecting_a_header_drops_the_previous_one() {
        let mut h = FlowHeader::new();
        h.ethernet_mut().src_mut().set_value("00:11:22:33:44:55".into());
        h.ipv4_mut().time_to_live_mut().set_value(3);
        assert_eq!(h.choice(), Some(FlowHeaderChoice::Ipv4));
        assert!(h.ethernet().is_none());
        h.ethernet_mut();
        assert!(h.ethernet().unwrap().src().is_none());
    }

    #[test]
    fn unspecified_choice_is_reported() {
        let mut h = FlowHeader::new();
        h.set_choice(FlowHeaderChoice::Unspecified);
        assert_eq!(h.choice(), Some(FlowHeaderChoice::Ethernet));
        let err = h.validate().unwrap_err();
        assert_eq!(err.messages, ["unspecified is not a valid choice on FlowHeaderChoiceEnum"]);

        h.set_ipv4(FlowIpv4::new());
        assert!(h.validate().is_ok());
        h.set_choice(FlowHeaderChoice::Unspecified);
        h.vlan_mut();
        assert!(h.validate().is_ok());
    }

    #[test]
    fn decoded_header_infers_choice() {
        let m = msg::FlowHeader {
            vlan: Some(msg::FlowVlan::default()),
            ..Default::default()
        };
        let h = FlowHeader::from_msg(m);
        assert_eq!(h.choice(), Some(FlowHeaderChoice::Vlan));
        assert!(h.validate().is_ok());
    }

    #[test]
    fn decoded_header_with_mismatched_tag_is_reported() {
        let m = msg::FlowHeader {
            choice: Some(FlowHeaderChoice::Ipv4.into()),
            vlan: Some(msg::FlowVlan::default()),
            ..Default::default()
        };
        let h = FlowHeader::from_msg(m);
        assert_eq!(h.choice(), Some(FlowHeaderChoice::Ipv4));
        let err = h.validate().unwrap_err();
        assert!(err.contains("choice not matching with property in FlowHeader"));
    }

    #[test]
    fn deprecated_pfc_queue_warns() {
        let mut eth = FlowEthernet::new();
        assert_eq!(eth.validate().unwrap(), Vec::<String>::new());
        eth.pfc_queue_mut().set_value(3);
        let warnings = eth.validate().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("pfc_queue property in schema FlowEthernet is deprecated"));
    }

    #[test]
    fn pattern_children_are_validated() {
        let mut v = FlowVlan::new();
        v.id_mut().set_values(vec![1, 4096, 7, 5000]);
        v.cfi_mut().set_value(2);
        let err = v.validate().unwrap_err();
        assert_eq!(
            err.messages,
            [
                "min 0 max 1 but got 2 on PatternFlowVlanCfi.value",
                "min 0 max 4095 but got 4096 on PatternFlowVlanId.values[1]",
                "min 0 max 4095 but got 5000 on PatternFlowVlanId.values[3]",
            ]
        );
    }

    #[test]
    fn snmp_defaults_community_and_bindings() {
        let mut s = FlowSnmpv2c::new();
        assert_eq!(s.community(), Some("community"));
        let b = s.variable_bindings_mut().add();
        b.object_identifier_mut().set_value("1.3.6.1.2.1".into());
        assert_eq!(b.integer_value_mut().choice(), Some(PatternChoice::Value));
        assert_eq!(s.variable_bindings().len(), 1);
        assert!(s.validate().is_ok());
    }
}
