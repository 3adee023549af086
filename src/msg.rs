//! Backing records: protobuf messages (prost) that also carry the JSON/YAML mapping (serde).
//!
//! Field names in JSON/YAML are the proto field names. Unpopulated fields are omitted on
//! output and unknown fields are rejected on input. Enum fields are `Option<i32>` on the
//! wire and their lowercase names in text formats.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Enum with a stable text name for each wire value.
pub trait NamedEnum: Sized + Copy + TryFrom<i32> + Into<i32> {
    /// Enum type name used in choice error messages.
    const ENUM: &'static str;
    fn name(self) -> &'static str;
    fn from_name(s: &str) -> Option<Self>;
}

macro_rules! named_enum {
    ($(#[$m:meta])* $name:ident : $label:literal { $($variant:ident = $num:literal => $text:literal),+ $(,)? }) => {
        $(#[$m])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum $name {
            Unspecified = 0,
            $($variant = $num),+
        }

        impl NamedEnum for $name {
            const ENUM: &'static str = $label;

            fn name(self) -> &'static str {
                match self {
                    $name::Unspecified => "unspecified",
                    $($name::$variant => $text),+
                }
            }

            fn from_name(s: &str) -> Option<Self> {
                match s {
                    "unspecified" => Some($name::Unspecified),
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

/// serde adapters for `Option<i32>` enum fields.
pub mod enum_name {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NameOrNumber {
        Name(String),
        Number(i32),
    }

    pub fn serialize<E: NamedEnum, S: Serializer>(v: &Option<i32>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(n) => match E::try_from(*n) {
                Ok(e) => s.serialize_str(e.name()),
                Err(_) => s.serialize_i32(*n),
            },
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, E: NamedEnum, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
        match Option::<NameOrNumber>::deserialize(d)? {
            None => Ok(None),
            Some(NameOrNumber::Number(n)) => Ok(Some(n)),
            Some(NameOrNumber::Name(name)) => match E::from_name(&name) {
                Some(e) => Ok(Some(e.into())),
                None => Err(serde::de::Error::custom(format!(
                    "invalid value for enum {}: {}",
                    E::ENUM,
                    name
                ))),
            },
        }
    }
}

/// Field names whose values are enum identifiers in protobuf text format.
pub const ENUM_FIELDS: &[&str] = &["choice", "mode"];

/// Repeated field names; a single text-format occurrence still reads back as a list.
pub const REPEATED_FIELDS: &[&str] = &[
    "ports",
    "flows",
    "packet",
    "rx_names",
    "tx_names",
    "values",
    "variable_bindings",
];

named_enum! {
    /// Active variant of a pattern.
    PatternChoice: "PatternChoiceEnum" {
        Value = 2 => "value",
        Values = 3 => "values",
        Auto = 1 => "auto",
        Increment = 4 => "increment",
        Decrement = 5 => "decrement",
    }
}

named_enum! {
    FlowTxRxChoice: "FlowTxRxChoiceEnum" {
        Port = 1 => "port",
        Device = 2 => "device",
    }
}

named_enum! {
    FlowRouterMode: "FlowRouterModeEnum" {
        Mesh = 1 => "mesh",
        OneToOne = 2 => "one_to_one",
    }
}

named_enum! {
    FlowSizeChoice: "FlowSizeChoiceEnum" {
        Fixed = 1 => "fixed",
        Increment = 2 => "increment",
    }
}

named_enum! {
    FlowHeaderChoice: "FlowHeaderChoiceEnum" {
        Ethernet = 1 => "ethernet",
        Vlan = 2 => "vlan",
        Ipv4 = 3 => "ipv4",
        Ipv6 = 4 => "ipv6",
        Snmpv2c = 5 => "snmpv2c",
    }
}

macro_rules! pattern_msg {
    ($pattern:ident, $counter:ident, $ty:ty, $p:ident) => {
        #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
        #[serde(deny_unknown_fields)]
        pub struct $counter {
            #[prost($p, optional, tag = "1")]
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub start: Option<$ty>,
            #[prost($p, optional, tag = "2")]
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub step: Option<$ty>,
            #[prost(uint32, optional, tag = "3")]
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub count: Option<u32>,
        }

        #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
        #[serde(deny_unknown_fields)]
        pub struct $pattern {
            #[prost(enumeration = "PatternChoice", optional, tag = "1")]
            #[serde(
                default,
                skip_serializing_if = "Option::is_none",
                serialize_with = "enum_name::serialize::<PatternChoice, _>",
                deserialize_with = "enum_name::deserialize::<PatternChoice, _>"
            )]
            pub choice: Option<i32>,
            #[prost($p, optional, tag = "2")]
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub value: Option<$ty>,
            #[prost($p, repeated, tag = "3")]
            #[serde(default, skip_serializing_if = "Vec::is_empty")]
            pub values: Vec<$ty>,
            #[prost($p, optional, tag = "4")]
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub auto: Option<$ty>,
            #[prost(message, optional, tag = "5")]
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub increment: Option<$counter>,
            #[prost(message, optional, tag = "6")]
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub decrement: Option<$counter>,
        }
    };
}

pattern_msg!(PatternUint, CounterUint, u32, uint32);
pattern_msg!(PatternInt, CounterInt, i32, int32);
pattern_msg!(PatternStr, CounterStr, String, string);

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[prost(message, repeated, tag = "1")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<Port>,
    #[prost(message, repeated, tag = "2")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flows: Vec<Flow>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Port {
    #[prost(string, optional, tag = "1")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[prost(string, optional, tag = "2")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Flow {
    #[prost(message, optional, tag = "1")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_rx: Option<FlowTxRx>,
    #[prost(message, repeated, tag = "2")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packet: Vec<FlowHeader>,
    #[prost(message, optional, tag = "3")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<FlowSize>,
    #[prost(string, optional, tag = "4")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowTxRx {
    #[prost(enumeration = "FlowTxRxChoice", optional, tag = "1")]
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "enum_name::serialize::<FlowTxRxChoice, _>",
        deserialize_with = "enum_name::deserialize::<FlowTxRxChoice, _>"
    )]
    pub choice: Option<i32>,
    #[prost(message, optional, tag = "2")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<FlowPort>,
    #[prost(message, optional, tag = "3")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<FlowRouter>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowPort {
    #[prost(string, optional, tag = "1")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_name: Option<String>,
    #[prost(string, repeated, tag = "2")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rx_names: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowRouter {
    #[prost(enumeration = "FlowRouterMode", optional, tag = "1")]
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "enum_name::serialize::<FlowRouterMode, _>",
        deserialize_with = "enum_name::deserialize::<FlowRouterMode, _>"
    )]
    pub mode: Option<i32>,
    #[prost(string, repeated, tag = "2")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tx_names: Vec<String>,
    #[prost(string, repeated, tag = "3")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rx_names: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowSize {
    #[prost(enumeration = "FlowSizeChoice", optional, tag = "1")]
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "enum_name::serialize::<FlowSizeChoice, _>",
        deserialize_with = "enum_name::deserialize::<FlowSizeChoice, _>"
    )]
    pub choice: Option<i32>,
    #[prost(uint32, optional, tag = "2")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<u32>,
    #[prost(message, optional, tag = "3")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub increment: Option<FlowSizeIncrement>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowSizeIncrement {
    #[prost(uint32, optional, tag = "1")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[prost(uint32, optional, tag = "2")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<u32>,
    #[prost(uint32, optional, tag = "3")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowHeader {
    #[prost(enumeration = "FlowHeaderChoice", optional, tag = "1")]
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "enum_name::serialize::<FlowHeaderChoice, _>",
        deserialize_with = "enum_name::deserialize::<FlowHeaderChoice, _>"
    )]
    pub choice: Option<i32>,
    #[prost(message, optional, tag = "2")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethernet: Option<FlowEthernet>,
    #[prost(message, optional, tag = "3")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<FlowVlan>,
    #[prost(message, optional, tag = "4")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<FlowIpv4>,
    #[prost(message, optional, tag = "5")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<FlowIpv6>,
    #[prost(message, optional, tag = "6")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snmpv2c: Option<FlowSnmpv2c>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowEthernet {
    #[prost(message, optional, tag = "1")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst: Option<PatternStr>,
    #[prost(message, optional, tag = "2")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<PatternStr>,
    #[prost(message, optional, tag = "3")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ether_type: Option<PatternUint>,
    #[prost(message, optional, tag = "4")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pfc_queue: Option<PatternUint>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowVlan {
    #[prost(message, optional, tag = "1")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<PatternUint>,
    #[prost(message, optional, tag = "2")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfi: Option<PatternUint>,
    #[prost(message, optional, tag = "3")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PatternUint>,
    #[prost(message, optional, tag = "4")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tpid: Option<PatternUint>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowIpv4 {
    #[prost(message, optional, tag = "1")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<PatternUint>,
    #[prost(message, optional, tag = "2")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_length: Option<PatternUint>,
    #[prost(message, optional, tag = "3")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_live: Option<PatternUint>,
    #[prost(message, optional, tag = "4")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<PatternUint>,
    #[prost(message, optional, tag = "5")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<PatternStr>,
    #[prost(message, optional, tag = "6")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst: Option<PatternStr>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowIpv6 {
    #[prost(message, optional, tag = "1")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<PatternUint>,
    #[prost(message, optional, tag = "2")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_label: Option<PatternUint>,
    #[prost(message, optional, tag = "3")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hop_limit: Option<PatternUint>,
    #[prost(message, optional, tag = "4")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<PatternStr>,
    #[prost(message, optional, tag = "5")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst: Option<PatternStr>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowSnmpv2c {
    #[prost(message, optional, tag = "1")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<PatternUint>,
    #[prost(string, optional, tag = "2")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
    #[prost(message, optional, tag = "3")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<PatternInt>,
    #[prost(message, repeated, tag = "4")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variable_bindings: Vec<FlowSnmpv2cVariableBinding>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowSnmpv2cVariableBinding {
    #[prost(message, optional, tag = "1")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_identifier: Option<PatternStr>,
    #[prost(message, optional, tag = "2")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integer_value: Option<PatternInt>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn enum_names_both_directions() {
        assert_eq!(PatternChoice::Increment.name(), "increment");
        assert_eq!(PatternChoice::from_name("auto"), Some(PatternChoice::Auto));
        assert_eq!(FlowRouterMode::from_name("one_to_one"), Some(FlowRouterMode::OneToOne));
        assert_eq!(FlowHeaderChoice::from_name("tcp"), None);
    }

    #[test]
    fn json_uses_enum_names_and_omits_unset() {
        let p = PatternUint {
            choice: Some(PatternChoice::Values.into()),
            values: vec![1, 2],
            ..Default::default()
        };
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"choice":"values","values":[1,2]}"#);
        let back: PatternUint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn json_rejects_unknown_fields_and_enum_names() {
        assert!(serde_json::from_str::<PatternUint>(r#"{"valu": 1}"#).is_err());
        let err = serde_json::from_str::<PatternUint>(r#"{"choice": "random"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid value for enum PatternChoiceEnum: random"));
    }

    #[test]
    fn binary_round_trip() {
        let cfg = Config {
            ports: vec![Port {
                name: Some("p1".into()),
                location: None,
            }],
            flows: vec![],
        };
        let bytes = cfg.encode_to_vec();
        assert_eq!(Config::decode(bytes.as_slice()).unwrap(), cfg);
    }
}
