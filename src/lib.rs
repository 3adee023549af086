//! # otgmodel: Traffic Generator Configuration Model
//!
//! Typed configuration objects for a traffic-generation API: build a tree in memory,
//! validate it, apply defaults, and serialize it to protobuf binary, protobuf text, JSON
//! or YAML.
//!
//! ## Model
//!
//! - **Config**: ports and flows
//! - **Flow**: a required tx/rx endpoint choice, a list of packet headers, a frame size
//! - **FlowHeader**: one of ethernet, vlan, ipv4, ipv6, snmpv2c
//! - **Pattern fields**: every header field is a `Pattern` whose exclusive choice is a
//!   literal `value`, a list of `values`, an `auto` value, or an `increment`/`decrement`
//!   counter
//!
//! ## Validation
//!
//! Validation walks the whole tree and accumulates every error (range, address syntax,
//! invalid or mismatched choices, missing required fields, duplicate names, dangling port
//! references) into one [`ValidationError`]. Serializing validates first; deserializing
//! validates after decoding.
//!
//! ## Example
//!
//! ```
//! use otgmodel::{Config, ObjectNode};
//!
//! let mut config = Config::new();
//! config.ports_mut().add().set_name("p1");
//! let flow = config.flows_mut().add();
//! flow.set_name("f1");
//! flow.tx_rx_mut().port_mut().set_tx_name("p1");
//! flow.packet_mut().add().ipv4_mut().time_to_live_mut().set_value(32);
//!
//! let json = config.to_json().expect("valid config");
//! let back = Config::from_json(&json).expect("decode");
//! assert_eq!(back.flows().len(), 1);
//! ```

pub mod config;
pub mod constraint;
pub mod header;
pub mod marshal;
pub mod msg;
pub mod node;
pub mod pattern;
pub mod patterns;
pub mod pbtext;
pub mod validation;
pub mod value;

pub use config::{
    Config, Flow, FlowPort, FlowRouter, FlowSize, FlowSizeIncrement, FlowSizeVariant, FlowTxRx,
    FlowTxRxVariant, Port,
};
pub use constraint::Format;
pub use header::{
    FlowEthernet, FlowHeader, FlowHeaderVariant, FlowIpv4, FlowIpv6, FlowSnmpv2c,
    FlowSnmpv2cVariableBinding, FlowVlan,
};
pub use marshal::{MarshalOptions, WireFormat};
pub use msg::{FlowHeaderChoice, FlowRouterMode, FlowSizeChoice, FlowTxRxChoice, PatternChoice};
pub use node::{ModelError, NodeList, ObjectNode};
pub use pattern::{Counter, Pattern, PatternKind, PatternScalar, PatternState};
pub use validation::{Validation, ValidationError};
