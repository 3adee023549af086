//! Top-level configuration: ports and the flows sent between them.

use crate::constraint;
use crate::header::FlowHeader;
use crate::msg::{self, FlowRouterMode, FlowSizeChoice, FlowTxRxChoice, NamedEnum};
use crate::node::{known_tag, resolve_choice, NodeList, ObjectNode};
use crate::validation::Validation;

const PORT: &str = "Port";
const FLOW: &str = "Flow";

const SIZE_FIXED_DEFAULT: u32 = 64;
const SIZE_START_DEFAULT: u32 = 64;
const SIZE_END_DEFAULT: u32 = 1518;
const SIZE_STEP_DEFAULT: u32 = 1;

/// Root of a traffic configuration.
#[derive(Debug, Default, PartialEq)]
pub struct Config {
    ports: NodeList<Port>,
    flows: NodeList<Flow>,
}

impl Config {
    pub fn new() -> Self {
        let mut obj = Self::default();
        obj.set_default();
        obj
    }

    pub fn ports(&self) -> &NodeList<Port> {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> &mut NodeList<Port> {
        &mut self.ports
    }

    pub fn flows(&self) -> &NodeList<Flow> {
        &self.flows
    }

    pub fn flows_mut(&mut self) -> &mut NodeList<Flow> {
        &mut self.flows
    }
}

impl ObjectNode for Config {
    type Msg = msg::Config;
    const TYPE_NAME: &'static str = "Config";

    fn to_msg(&self) -> msg::Config {
        msg::Config {
            ports: self.ports.to_msgs(),
            flows: self.flows.to_msgs(),
        }
    }

    fn set_msg(&mut self, msg: msg::Config) -> &mut Self {
        *self = Config {
            ports: NodeList::from_msgs(msg.ports),
            flows: NodeList::from_msgs(msg.flows),
        };
        self
    }

    fn set_default(&mut self) {
        self.ports.set_default();
        self.flows.set_default();
    }

    fn validate_obj(&self, vobj: &mut Validation) {
        vobj.scope(PORT);
        self.ports.validate_obj(vobj);
        self.flows.validate_obj(vobj);
    }
}

/// Test port. `name` is unique across the configuration and is what flows refer to.
#[derive(Debug, Default, PartialEq)]
pub struct Port {
    location: Option<String>,
    name: Option<String>,
}

impl Port {
    pub fn new() -> Self {
        let mut obj = Self::default();
        obj.set_default();
        obj
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn set_location(&mut self, v: impl Into<String>) -> &mut Self {
        self.location = Some(v.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, v: impl Into<String>) -> &mut Self {
        self.name = Some(v.into());
        self
    }
}

impl ObjectNode for Port {
    type Msg = msg::Port;
    const TYPE_NAME: &'static str = PORT;

    fn to_msg(&self) -> msg::Port {
        msg::Port {
            location: self.location.clone(),
            name: self.name.clone(),
        }
    }

    fn set_msg(&mut self, msg: msg::Port) -> &mut Self {
        *self = Port {
            location: msg.location,
            name: msg.name,
        };
        self
    }

    fn set_default(&mut self) {}

    fn validate_obj(&self, vobj: &mut Validation) {
        match &self.name {
            Some(name) => vobj.unique(PORT, name),
            None => vobj.required("name", PORT),
        }
    }
}

/// A stream of packets from one transmit endpoint.
#[derive(Debug, Default, PartialEq)]
pub struct Flow {
    tx_rx: Option<FlowTxRx>,
    packet: NodeList<FlowHeader>,
    size: Option<FlowSize>,
    name: Option<String>,
}

impl Flow {
    pub fn new() -> Self {
        let mut obj = Self::default();
        obj.set_default();
        obj
    }

    pub fn tx_rx(&self) -> Option<&FlowTxRx> {
        self.tx_rx.as_ref()
    }

    /// Created with no endpoint chosen on first access.
    pub fn tx_rx_mut(&mut self) -> &mut FlowTxRx {
        self.tx_rx.get_or_insert_with(FlowTxRx::new)
    }

    pub fn set_tx_rx(&mut self, v: FlowTxRx) -> &mut Self {
        self.tx_rx = Some(v);
        self
    }

    pub fn packet(&self) -> &NodeList<FlowHeader> {
        &self.packet
    }

    pub fn packet_mut(&mut self) -> &mut NodeList<FlowHeader> {
        &mut self.packet
    }

    pub fn size(&self) -> Option<&FlowSize> {
        self.size.as_ref()
    }

    pub fn size_mut(&mut self) -> &mut FlowSize {
        self.size.get_or_insert_with(FlowSize::new)
    }

    pub fn set_size(&mut self, v: FlowSize) -> &mut Self {
        self.size = Some(v);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, v: impl Into<String>) -> &mut Self {
        self.name = Some(v.into());
        self
    }
}

impl ObjectNode for Flow {
    type Msg = msg::Flow;
    const TYPE_NAME: &'static str = FLOW;

    fn to_msg(&self) -> msg::Flow {
        msg::Flow {
            tx_rx: self.tx_rx.as_ref().map(ObjectNode::to_msg),
            packet: self.packet.to_msgs(),
            size: self.size.as_ref().map(ObjectNode::to_msg),
            name: self.name.clone(),
        }
    }

    fn set_msg(&mut self, msg: msg::Flow) -> &mut Self {
        *self = Flow {
            tx_rx: msg.tx_rx.map(FlowTxRx::from_msg),
            packet: NodeList::from_msgs(msg.packet),
            size: msg.size.map(FlowSize::from_msg),
            name: msg.name,
        };
        self
    }

    fn set_default(&mut self) {
        if let Some(t) = &mut self.tx_rx {
            t.set_default();
        }
        self.packet.set_default();
        if let Some(s) = &mut self.size {
            s.set_default();
        }
    }

    fn validate_obj(&self, vobj: &mut Validation) {
        match &self.tx_rx {
            Some(t) => t.validate_obj(vobj),
            None => vobj.required("tx_rx", FLOW),
        }
        self.packet.validate_obj(vobj);
        if let Some(s) = &self.size {
            s.validate_obj(vobj);
        }
        match &self.name {
            Some(name) => vobj.unique(FLOW, name),
            None => vobj.required("name", FLOW),
        }
    }
}

/// Active endpoint of a [`FlowTxRx`].
#[derive(Debug, PartialEq)]
pub enum FlowTxRxVariant {
    Port(FlowPort),
    Device(FlowRouter),
}

impl FlowTxRxVariant {
    pub fn choice(&self) -> FlowTxRxChoice {
        match self {
            FlowTxRxVariant::Port(_) => FlowTxRxChoice::Port,
            FlowTxRxVariant::Device(_) => FlowTxRxChoice::Device,
        }
    }
}

/// Transmit/receive endpoints of a flow. The choice is required and never defaulted: a node
/// with no endpoint fails validation.
#[derive(Debug, Default, PartialEq)]
pub struct FlowTxRx {
    variant: Option<FlowTxRxVariant>,
    issues: Vec<String>,
}

impl FlowTxRx {
    pub fn new() -> Self {
        let mut obj = Self::default();
        obj.set_default();
        obj
    }

    pub fn choice(&self) -> Option<FlowTxRxChoice> {
        self.variant.as_ref().map(FlowTxRxVariant::choice)
    }

    fn replace(&mut self, variant: FlowTxRxVariant) {
        self.variant = Some(variant);
        self.issues.clear();
    }

    /// Select `choice` with a defaulted endpoint. Re-selecting the active choice keeps it.
    pub fn set_choice(&mut self, choice: FlowTxRxChoice) -> &mut Self {
        if self.choice() == Some(choice) {
            self.issues.clear();
            return self;
        }
        match choice {
            FlowTxRxChoice::Port => self.replace(FlowTxRxVariant::Port(FlowPort::new())),
            FlowTxRxChoice::Device => self.replace(FlowTxRxVariant::Device(FlowRouter::new())),
            FlowTxRxChoice::Unspecified => self.issues.push(format!(
                "{} is not a valid choice on {}ChoiceEnum",
                choice.name(),
                Self::TYPE_NAME
            )),
        }
        self
    }

    pub fn port(&self) -> Option<&FlowPort> {
        match &self.variant {
            Some(FlowTxRxVariant::Port(p)) => Some(p),
            _ => None,
        }
    }

    /// Select the port endpoint if it is not active and return it.
    pub fn port_mut(&mut self) -> &mut FlowPort {
        self.set_choice(FlowTxRxChoice::Port);
        match &mut self.variant {
            Some(FlowTxRxVariant::Port(p)) => p,
            _ => unreachable!("port endpoint was just selected"),
        }
    }

    pub fn set_port(&mut self, p: FlowPort) -> &mut Self {
        self.replace(FlowTxRxVariant::Port(p));
        self
    }

    pub fn device(&self) -> Option<&FlowRouter> {
        match &self.variant {
            Some(FlowTxRxVariant::Device(d)) => Some(d),
            _ => None,
        }
    }

    /// Select the device endpoint if it is not active and return it.
    pub fn device_mut(&mut self) -> &mut FlowRouter {
        self.set_choice(FlowTxRxChoice::Device);
        match &mut self.variant {
            Some(FlowTxRxVariant::Device(d)) => d,
            _ => unreachable!("device endpoint was just selected"),
        }
    }

    pub fn set_device(&mut self, d: FlowRouter) -> &mut Self {
        self.replace(FlowTxRxVariant::Device(d));
        self
    }
}

impl ObjectNode for FlowTxRx {
    type Msg = msg::FlowTxRx;
    const TYPE_NAME: &'static str = "FlowTxRx";

    fn to_msg(&self) -> msg::FlowTxRx {
        let mut m = msg::FlowTxRx {
            choice: self.choice().map(Into::into),
            ..Default::default()
        };
        match &self.variant {
            Some(FlowTxRxVariant::Port(p)) => m.port = Some(p.to_msg()),
            Some(FlowTxRxVariant::Device(d)) => m.device = Some(d.to_msg()),
            None => {}
        }
        m
    }

    fn set_msg(&mut self, msg: msg::FlowTxRx) -> &mut Self {
        *self = FlowTxRx::default();
        let tag = known_tag::<FlowTxRxChoice>(msg.choice, Self::TYPE_NAME, &mut self.issues);
        let mut populated = Vec::new();
        if msg.port.is_some() {
            populated.push(FlowTxRxChoice::Port);
        }
        if msg.device.is_some() {
            populated.push(FlowTxRxChoice::Device);
        }
        self.variant = match resolve_choice(tag, &populated, Self::TYPE_NAME, &mut self.issues) {
            Some(FlowTxRxChoice::Port) => Some(FlowTxRxVariant::Port(
                msg.port.map(FlowPort::from_msg).unwrap_or_else(FlowPort::new),
            )),
            Some(FlowTxRxChoice::Device) => Some(FlowTxRxVariant::Device(
                msg.device.map(FlowRouter::from_msg).unwrap_or_else(FlowRouter::new),
            )),
            Some(FlowTxRxChoice::Unspecified) | None => None,
        };
        self
    }

    /// Defaults the active endpoint only; an unset choice stays unset.
    fn set_default(&mut self) {
        match &mut self.variant {
            Some(FlowTxRxVariant::Port(p)) => p.set_default(),
            Some(FlowTxRxVariant::Device(d)) => d.set_default(),
            None => {}
        }
    }

    fn validate_obj(&self, vobj: &mut Validation) {
        for issue in &self.issues {
            vobj.error(issue.clone());
        }
        match &self.variant {
            Some(FlowTxRxVariant::Port(p)) => p.validate_obj(vobj),
            Some(FlowTxRxVariant::Device(d)) => d.validate_obj(vobj),
            None => vobj.required("Choice", Self::TYPE_NAME),
        }
    }
}

/// Port-to-port endpoints.
#[derive(Debug, Default, PartialEq)]
pub struct FlowPort {
    tx_name: Option<String>,
    rx_names: Vec<String>,
}

impl FlowPort {
    pub fn new() -> Self {
        let mut obj = Self::default();
        obj.set_default();
        obj
    }

    pub fn tx_name(&self) -> Option<&str> {
        self.tx_name.as_deref()
    }

    pub fn set_tx_name(&mut self, v: impl Into<String>) -> &mut Self {
        self.tx_name = Some(v.into());
        self
    }

    pub fn rx_names(&self) -> &[String] {
        &self.rx_names
    }

    pub fn set_rx_names(&mut self, v: Vec<String>) -> &mut Self {
        self.rx_names = v;
        self
    }
}

impl ObjectNode for FlowPort {
    type Msg = msg::FlowPort;
    const TYPE_NAME: &'static str = "FlowPort";

    fn to_msg(&self) -> msg::FlowPort {
        msg::FlowPort {
            tx_name: self.tx_name.clone(),
            rx_names: self.rx_names.clone(),
        }
    }

    fn set_msg(&mut self, msg: msg::FlowPort) -> &mut Self {
        *self = FlowPort {
            tx_name: msg.tx_name,
            rx_names: msg.rx_names,
        };
        self
    }

    fn set_default(&mut self) {}

    fn validate_obj(&self, vobj: &mut Validation) {
        match &self.tx_name {
            Some(name) => vobj.reference(name, PORT, Self::TYPE_NAME, "tx_name"),
            None => vobj.required("tx_name", Self::TYPE_NAME),
        }
        for (i, name) in self.rx_names.iter().enumerate() {
            vobj.reference(name, PORT, Self::TYPE_NAME, &format!("rx_names[{}]", i));
        }
    }
}

/// Endpoints given as lists of names, connected according to `mode`.
#[derive(Debug, Default, PartialEq)]
pub struct FlowRouter {
    mode: Option<FlowRouterMode>,
    tx_names: Vec<String>,
    rx_names: Vec<String>,
    issues: Vec<String>,
}

impl FlowRouter {
    pub fn new() -> Self {
        let mut obj = Self::default();
        obj.set_default();
        obj
    }

    pub fn mode(&self) -> Option<FlowRouterMode> {
        self.mode
    }

    /// Set `mode`, dropping any report about a decoded mode number.
    pub fn set_mode(&mut self, mode: FlowRouterMode) -> &mut Self {
        self.mode = Some(mode);
        self.issues.clear();
        self
    }

    pub fn tx_names(&self) -> &[String] {
        &self.tx_names
    }

    pub fn set_tx_names(&mut self, v: Vec<String>) -> &mut Self {
        self.tx_names = v;
        self
    }

    pub fn rx_names(&self) -> &[String] {
        &self.rx_names
    }

    pub fn set_rx_names(&mut self, v: Vec<String>) -> &mut Self {
        self.rx_names = v;
        self
    }
}

impl ObjectNode for FlowRouter {
    type Msg = msg::FlowRouter;
    const TYPE_NAME: &'static str = "FlowRouter";

    fn to_msg(&self) -> msg::FlowRouter {
        msg::FlowRouter {
            mode: self.mode.map(Into::into),
            tx_names: self.tx_names.clone(),
            rx_names: self.rx_names.clone(),
        }
    }

    fn set_msg(&mut self, msg: msg::FlowRouter) -> &mut Self {
        *self = FlowRouter::default();
        self.mode = match msg.mode.filter(|&n| n != 0) {
            None => None,
            Some(n) => match FlowRouterMode::try_from(n) {
                Ok(mode) => Some(mode),
                Err(_) => {
                    self.issues.push(format!(
                        "{} is not a valid value on {}",
                        n,
                        FlowRouterMode::ENUM
                    ));
                    None
                }
            },
        };
        self.tx_names = msg.tx_names;
        self.rx_names = msg.rx_names;
        self
    }

    fn set_default(&mut self) {
        if self.mode.is_none() {
            self.mode = Some(FlowRouterMode::Mesh);
        }
    }

    fn validate_obj(&self, vobj: &mut Validation) {
        for issue in &self.issues {
            vobj.error(issue.clone());
        }
        for (i, name) in self.tx_names.iter().enumerate() {
            vobj.reference(name, PORT, Self::TYPE_NAME, &format!("tx_names[{}]", i));
        }
        for (i, name) in self.rx_names.iter().enumerate() {
            vobj.reference(name, PORT, Self::TYPE_NAME, &format!("rx_names[{}]", i));
        }
    }
}

/// Active variant of a [`FlowSize`].
#[derive(Debug, PartialEq)]
pub enum FlowSizeVariant {
    Fixed(u32),
    Increment(FlowSizeIncrement),
}

/// Frame size of a flow. Defaults to a fixed 64 bytes.
#[derive(Debug, Default, PartialEq)]
pub struct FlowSize {
    variant: Option<FlowSizeVariant>,
    issues: Vec<String>,
}

impl FlowSize {
    pub fn new() -> Self {
        let mut obj = Self::default();
        obj.set_default();
        obj
    }

    pub fn choice(&self) -> Option<FlowSizeChoice> {
        self.variant.as_ref().map(|v| match v {
            FlowSizeVariant::Fixed(_) => FlowSizeChoice::Fixed,
            FlowSizeVariant::Increment(_) => FlowSizeChoice::Increment,
        })
    }

    fn replace(&mut self, variant: FlowSizeVariant) {
        self.variant = Some(variant);
        self.issues.clear();
    }

    pub fn fixed(&self) -> Option<u32> {
        match &self.variant {
            Some(FlowSizeVariant::Fixed(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn set_fixed(&mut self, n: u32) -> &mut Self {
        self.replace(FlowSizeVariant::Fixed(n));
        self
    }

    pub fn increment(&self) -> Option<&FlowSizeIncrement> {
        match &self.variant {
            Some(FlowSizeVariant::Increment(i)) => Some(i),
            _ => None,
        }
    }

    /// Select `increment` if it is not active and return it.
    pub fn increment_mut(&mut self) -> &mut FlowSizeIncrement {
        if !matches!(self.variant, Some(FlowSizeVariant::Increment(_))) {
            self.replace(FlowSizeVariant::Increment(FlowSizeIncrement::new()));
        }
        match &mut self.variant {
            Some(FlowSizeVariant::Increment(i)) => i,
            _ => unreachable!("increment was just selected"),
        }
    }

    pub fn set_increment(&mut self, i: FlowSizeIncrement) -> &mut Self {
        self.replace(FlowSizeVariant::Increment(i));
        self
    }
}

impl ObjectNode for FlowSize {
    type Msg = msg::FlowSize;
    const TYPE_NAME: &'static str = "FlowSize";

    fn to_msg(&self) -> msg::FlowSize {
        let mut m = msg::FlowSize {
            choice: self.choice().map(Into::into),
            ..Default::default()
        };
        match &self.variant {
            Some(FlowSizeVariant::Fixed(n)) => m.fixed = Some(*n),
            Some(FlowSizeVariant::Increment(i)) => m.increment = Some(i.to_msg()),
            None => {}
        }
        m
    }

    fn set_msg(&mut self, msg: msg::FlowSize) -> &mut Self {
        *self = FlowSize::default();
        let tag = known_tag::<FlowSizeChoice>(msg.choice, Self::TYPE_NAME, &mut self.issues);
        let mut populated = Vec::new();
        if msg.fixed.is_some() {
            populated.push(FlowSizeChoice::Fixed);
        }
        if msg.increment.is_some() {
            populated.push(FlowSizeChoice::Increment);
        }
        self.variant = match resolve_choice(tag, &populated, Self::TYPE_NAME, &mut self.issues) {
            Some(FlowSizeChoice::Fixed) => {
                Some(FlowSizeVariant::Fixed(msg.fixed.unwrap_or(SIZE_FIXED_DEFAULT)))
            }
            Some(FlowSizeChoice::Increment) => Some(FlowSizeVariant::Increment(
                msg.increment
                    .map(FlowSizeIncrement::from_msg)
                    .unwrap_or_else(FlowSizeIncrement::new),
            )),
            Some(FlowSizeChoice::Unspecified) | None => None,
        };
        self
    }

    fn set_default(&mut self) {
        match &mut self.variant {
            None => self.variant = Some(FlowSizeVariant::Fixed(SIZE_FIXED_DEFAULT)),
            Some(FlowSizeVariant::Increment(i)) => i.set_default(),
            Some(FlowSizeVariant::Fixed(_)) => {}
        }
    }

    fn validate_obj(&self, vobj: &mut Validation) {
        for issue in &self.issues {
            vobj.error(issue.clone());
        }
        if let Some(FlowSizeVariant::Increment(i)) = &self.variant {
            i.validate_obj(vobj);
        }
    }
}

/// Frame sizes stepping from `start` to `end`.
#[derive(Debug, Default, PartialEq)]
pub struct FlowSizeIncrement {
    start: Option<u32>,
    end: Option<u32>,
    step: Option<u32>,
}

impl FlowSizeIncrement {
    pub fn new() -> Self {
        let mut obj = Self::default();
        obj.set_default();
        obj
    }

    pub fn start(&self) -> Option<u32> {
        self.start
    }

    pub fn set_start(&mut self, v: u32) -> &mut Self {
        self.start = Some(v);
        self
    }

    pub fn end(&self) -> Option<u32> {
        self.end
    }

    pub fn set_end(&mut self, v: u32) -> &mut Self {
        self.end = Some(v);
        self
    }

    pub fn step(&self) -> Option<u32> {
        self.step
    }

    pub fn set_step(&mut self, v: u32) -> &mut Self {
        self.step = Some(v);
        self
    }
}

impl ObjectNode for FlowSizeIncrement {
    type Msg = msg::FlowSizeIncrement;
    const TYPE_NAME: &'static str = "FlowSizeIncrement";

    fn to_msg(&self) -> msg::FlowSizeIncrement {
        msg::FlowSizeIncrement {
            start: self.start,
            end: self.end,
            step: self.step,
        }
    }

    fn set_msg(&mut self, msg: msg::FlowSizeIncrement) -> &mut Self {
        *self = FlowSizeIncrement {
            start: msg.start,
            end: msg.end,
            step: msg.step,
        };
        self
    }

    fn set_default(&mut self) {
        self.start = self.start.or(Some(SIZE_START_DEFAULT));
        self.end = self.end.or(Some(SIZE_END_DEFAULT));
        self.step = self.step.or(Some(SIZE_STEP_DEFAULT));
    }

    fn validate_obj(&self, vobj: &mut Validation) {
        for (field, v) in [("start", self.start), ("end", self.end)] {
            if let Some(v) = v {
                if let Err(e) = constraint::check_range(v as i64, 1, u32::MAX as i64) {
                    vobj.error_at(e, Self::TYPE_NAME, field);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_ports() -> Config {
        let mut c = Config::new();
        c.ports_mut().add().set_name("p1").set_location("localhost:5555");
        c.ports_mut().add().set_name("p2");
        c
    }

    #[test]
    fn required_choice_is_not_defaulted() {
        let mut t = FlowTxRx::new();
        t.set_default();
        assert_eq!(t.choice(), None);
        let err = t.validate().unwrap_err();
        assert_eq!(err.messages, ["Choice is required field on interface FlowTxRx"]);
    }

    #[test]
    fn decoded_endpoint_self_selects() {
        let m = msg::FlowTxRx {
            device: Some(msg::FlowRouter::default()),
            ..Default::default()
        };
        let mut t = FlowTxRx::from_msg(m);
        assert_eq!(t.choice(), Some(FlowTxRxChoice::Device));
        assert!(t.validate_to_and_from().is_ok());
        assert_eq!(t.device().unwrap().mode(), Some(FlowRouterMode::Mesh));
    }

    #[test]
    fn both_endpoints_populated_is_reported() {
        let m = msg::FlowTxRx {
            port: Some(msg::FlowPort::default()),
            device: Some(msg::FlowRouter::default()),
            ..Default::default()
        };
        let t = FlowTxRx::from_msg(m);
        let err = t.validate().unwrap_err();
        assert_eq!(
            err.messages,
            [
                "choice not matching with property in FlowTxRx",
                "Choice is required field on interface FlowTxRx",
            ]
        );
    }

    #[test]
    fn names_are_unique_per_scope() {
        let mut c = two_ports();
        c.ports_mut().add().set_name("p1");
        let err = c.validate().unwrap_err();
        assert_eq!(err.messages, ["Port with name p1 already exists"]);
    }

    #[test]
    fn port_references_resolve() {
        let mut c = two_ports();
        let f = c.flows_mut().add();
        f.set_name("f1");
        f.tx_rx_mut()
            .port_mut()
            .set_tx_name("p1")
            .set_rx_names(vec!["p2".into(), "p9".into()]);
        let err = c.validate().unwrap_err();
        assert_eq!(
            err.messages,
            ["p9 is not a valid reference to Port.name on FlowPort.rx_names[1]"]
        );
    }

    #[test]
    fn config_without_ports_still_checks_references() {
        let mut c = Config::new();
        let f = c.flows_mut().add();
        f.set_name("f1");
        f.tx_rx_mut().port_mut().set_tx_name("p9");
        let err = c.validate().unwrap_err();
        assert_eq!(
            err.messages,
            ["p9 is not a valid reference to Port.name on FlowPort.tx_name"]
        );
    }

    #[test]
    fn endpoint_changes_drop_earlier_issues() {
        let mut t = FlowTxRx::new();
        t.set_choice(FlowTxRxChoice::Unspecified);
        assert!(t.validate().is_err());
        t.port_mut().set_tx_name("p1");
        assert!(t.validate().is_ok());

        let mut r = FlowRouter::from_msg(msg::FlowRouter {
            mode: Some(9),
            ..Default::default()
        });
        assert!(r.validate().is_err());
        r.set_mode(FlowRouterMode::OneToOne);
        assert!(r.validate().is_ok());
    }

    #[test]
    fn flow_requires_name_and_endpoints() {
        let mut c = Config::new();
        c.flows_mut().add();
        let err = c.validate().unwrap_err();
        assert_eq!(
            err.messages,
            [
                "tx_rx is required field on interface Flow",
                "name is required field on interface Flow",
            ]
        );
    }

    #[test]
    fn size_defaults_and_bounds() {
        let s = FlowSize::new();
        assert_eq!(s.fixed(), Some(64));
        let mut s = FlowSize::new();
        let inc = s.increment_mut();
        assert_eq!((inc.start(), inc.end(), inc.step()), (Some(64), Some(1518), Some(1)));
        inc.set_start(0);
        let err = s.validate().unwrap_err();
        assert_eq!(err.messages, ["min 1 max 4294967295 but got 0 on FlowSizeIncrement.start"]);
    }

    #[test]
    fn list_set_and_clear() {
        let mut c = two_ports();
        let mut p = Port::new();
        p.set_name("p3");
        c.ports_mut().set(1, p).unwrap();
        assert_eq!(c.ports().get(1).and_then(Port::name), Some("p3"));
        assert!(matches!(
            c.ports_mut().set(5, Port::new()),
            Err(crate::node::ModelError::IndexOutOfRange { index: 5, len: 2, .. })
        ));
        c.ports_mut().clear();
        assert!(c.ports().is_empty());
    }
}
