//! Pattern fields: a value that is a literal, a list of literals, an auto-generated value,
//! or an increment/decrement counter, selected by an exclusive choice.
//!
//! The variants are a Rust enum ([`PatternState`]), so setting one variant always drops the
//! others. Each field of the schema has its own [`PatternKind`] declaring the value type,
//! format, default literals and default choice; `Pattern<K>` is the node type for that field.
//!
//! Plain getters ([`Pattern::value`], [`Pattern::increment`], ...) are pure. The
//! `*_or_default` accessors select their variant first if it is not active, populating it
//! with the declared default literal.

use crate::constraint::{self, Format};
use crate::msg::{self, NamedEnum, PatternChoice};
use crate::node::{known_tag, resolve_choice, ObjectNode};
use crate::validation::Validation;
use crate::value;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

/// Scalar type carried by a pattern (`u32`, `i32` or an address/OID literal `String`).
pub trait PatternScalar: Clone + PartialEq + Default + fmt::Debug + Sized + 'static {
    /// Backing record holding a pattern of this scalar.
    type Record: prost::Message + Default + Clone + PartialEq + Serialize + DeserializeOwned;
    /// Type of default literals in [`pattern_kind!`] declarations.
    type Literal;

    fn from_literal(lit: Self::Literal) -> Self;
    fn check(&self, format: Format) -> Result<(), String>;
    fn to_wide(&self, format: Format) -> Option<u128>;
    fn from_wide(n: u128, format: Format) -> Option<Self>;
    /// Smallest increment for `format`.
    fn unit_step(format: Format) -> Self;
    fn into_record(parts: PatternParts<Self>) -> Self::Record;
    fn from_record(record: Self::Record) -> PatternParts<Self>;
}

/// Field-by-field view of a pattern record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PatternParts<T> {
    pub choice: Option<i32>,
    pub value: Option<T>,
    pub values: Vec<T>,
    pub auto: Option<T>,
    pub increment: Option<Counter<T>>,
    pub decrement: Option<Counter<T>>,
}

macro_rules! record_conversions {
    ($record:ident, $counter:ident) => {
        fn into_record(parts: PatternParts<Self>) -> msg::$record {
            let counter = |c: Counter<Self>| msg::$counter {
                start: c.start,
                step: c.step,
                count: c.count,
            };
            msg::$record {
                choice: parts.choice,
                value: parts.value,
                values: parts.values,
                auto: parts.auto,
                increment: parts.increment.map(counter),
                decrement: parts.decrement.map(counter),
            }
        }

        fn from_record(record: msg::$record) -> PatternParts<Self> {
            let counter = |c: msg::$counter| Counter {
                start: c.start,
                step: c.step,
                count: c.count,
            };
            PatternParts {
                choice: record.choice,
                value: record.value,
                values: record.values,
                auto: record.auto,
                increment: record.increment.map(counter),
                decrement: record.decrement.map(counter),
            }
        }
    };
}

impl PatternScalar for u32 {
    type Record = msg::PatternUint;
    type Literal = u32;

    fn from_literal(lit: u32) -> Self {
        lit
    }

    fn check(&self, format: Format) -> Result<(), String> {
        constraint::check_bits(*self as i64, format)
    }

    fn to_wide(&self, _format: Format) -> Option<u128> {
        Some(*self as u128)
    }

    fn from_wide(n: u128, _format: Format) -> Option<Self> {
        u32::try_from(n).ok()
    }

    fn unit_step(_format: Format) -> Self {
        1
    }

    record_conversions!(PatternUint, CounterUint);
}

impl PatternScalar for i32 {
    type Record = msg::PatternInt;
    type Literal = i32;

    fn from_literal(lit: i32) -> Self {
        lit
    }

    fn check(&self, format: Format) -> Result<(), String> {
        constraint::check_bits(*self as i64, format)
    }

    fn to_wide(&self, format: Format) -> Option<u128> {
        Some(value::signed_to_wide(*self as i64, value::width(format)))
    }

    fn from_wide(n: u128, format: Format) -> Option<Self> {
        i32::try_from(value::wide_to_signed(n, value::width(format))).ok()
    }

    fn unit_step(_format: Format) -> Self {
        1
    }

    record_conversions!(PatternInt, CounterInt);
}

impl PatternScalar for String {
    type Record = msg::PatternStr;
    type Literal = &'static str;

    fn from_literal(lit: &'static str) -> Self {
        lit.to_string()
    }

    fn check(&self, format: Format) -> Result<(), String> {
        constraint::check_literal(self, format)
    }

    fn to_wide(&self, format: Format) -> Option<u128> {
        value::literal_to_wide(self, format)
    }

    fn from_wide(n: u128, format: Format) -> Option<Self> {
        value::wide_to_literal(n, format)
    }

    fn unit_step(format: Format) -> Self {
        match format {
            Format::Ipv4 => "0.0.0.1".to_string(),
            Format::Ipv6 => "::1".to_string(),
            Format::Mac => "00:00:00:00:00:01".to_string(),
            Format::Oid => "0.1".to_string(),
            Format::Uint { .. } | Format::Int { .. } => "1".to_string(),
        }
    }

    record_conversions!(PatternStr, CounterStr);
}

/// Static description of one pattern field.
pub trait PatternKind: 'static {
    type Value: PatternScalar;
    /// Schema type name, used as the location prefix in validation messages.
    const NAME: &'static str;
    const FORMAT: Format;
    const DEFAULT_CHOICE: PatternChoice;

    fn default_value() -> Self::Value;

    /// Default auto literal; `None` when the field has no `auto` choice.
    fn default_auto() -> Option<Self::Value> {
        None
    }

    fn is_legal(choice: PatternChoice) -> bool {
        match choice {
            PatternChoice::Unspecified => false,
            PatternChoice::Auto => Self::default_auto().is_some(),
            PatternChoice::Increment | PatternChoice::Decrement => Self::FORMAT != Format::Oid,
            PatternChoice::Value | PatternChoice::Values => true,
        }
    }
}

/// Declare a pattern kind and its `Pattern` type alias.
///
/// ```ignore
/// pattern_kind! {
///     /// Time to live.
///     PatternFlowIpv4TimeToLive(FlowIpv4TimeToLiveKind) {
///         value: u32 = 64,
///         format: Uint(8),
///         default_choice: Value,
///     }
/// }
/// ```
#[macro_export]
macro_rules! pattern_kind {
    ($(#[$m:meta])* $alias:ident ($kind:ident) {
        value: $ty:ty = $default:expr,
        format: $fmt:ident $(($bits:literal))?,
        default_choice: $choice:ident,
        $(auto: $auto:expr,)?
    }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $kind;

        impl $crate::pattern::PatternKind for $kind {
            type Value = $ty;
            const NAME: &'static str = stringify!($alias);
            const FORMAT: $crate::constraint::Format = $crate::constraint::Format::$fmt $({ bits: $bits })?;
            const DEFAULT_CHOICE: $crate::msg::PatternChoice = $crate::msg::PatternChoice::$choice;

            fn default_value() -> $ty {
                <$ty as $crate::pattern::PatternScalar>::from_literal($default)
            }

            $(
                fn default_auto() -> Option<$ty> {
                    Some(<$ty as $crate::pattern::PatternScalar>::from_literal($auto))
                }
            )?
        }

        $(
            const _: () = assert!(
                $bits >= 1 && $bits <= 32,
                "pattern_kind!: integer bit width must be within 1..=32"
            );
        )?

        $(#[$m])*
        pub type $alias = $crate::pattern::Pattern<$kind>;
    };
}

/// Longest sequence [`Counter::expand`] materializes.
pub const MAX_EXPANSION: u32 = 1 << 16;

/// `{start, step, count}` description of an arithmetic or address sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Counter<T> {
    start: Option<T>,
    step: Option<T>,
    count: Option<u32>,
}

impl<T: PatternScalar> Counter<T> {
    /// All fields unset.
    pub fn new() -> Self {
        Counter {
            start: None,
            step: None,
            count: None,
        }
    }

    pub fn start(&self) -> Option<&T> {
        self.start.as_ref()
    }

    pub fn set_start(&mut self, v: T) -> &mut Self {
        self.start = Some(v);
        self
    }

    pub fn step(&self) -> Option<&T> {
        self.step.as_ref()
    }

    pub fn set_step(&mut self, v: T) -> &mut Self {
        self.step = Some(v);
        self
    }

    pub fn count(&self) -> Option<u32> {
        self.count
    }

    pub fn set_count(&mut self, v: u32) -> &mut Self {
        self.count = Some(v);
        self
    }

    /// Fill every unset field.
    pub fn set_default(&mut self, start: T, step: T) {
        if self.start.is_none() {
            self.start = Some(start);
        }
        if self.step.is_none() {
            self.step = Some(step);
        }
        if self.count.is_none() {
            self.count = Some(1);
        }
    }

    pub fn validate_obj(&self, vobj: &mut Validation, type_name: &str, format: Format) {
        if let Some(start) = &self.start {
            if let Err(e) = start.check(format) {
                vobj.error_at(e, type_name, "start");
            }
        }
        if let Some(step) = &self.step {
            if let Err(e) = step.check(format) {
                vobj.error_at(e, type_name, "step");
            }
        }
    }

    /// Concrete sequence, wrapping at the format's width. Unset fields are read as
    /// `start`/`step`/1. `None` if a literal cannot be converted or `count` exceeds
    /// [`MAX_EXPANSION`]; use [`Counter::iter`] to walk longer sequences lazily.
    pub fn expand(&self, up: bool, format: Format, start: &T, step: &T) -> Option<Vec<T>> {
        if self.count.unwrap_or(1) > MAX_EXPANSION {
            return None;
        }
        self.iter(up, format, start, step)?.collect()
    }

    /// Lazy form of [`Counter::expand`] with no length limit. Yields `None` for an element
    /// that does not fit the value type.
    pub fn iter(
        &self,
        up: bool,
        format: Format,
        start: &T,
        step: &T,
    ) -> Option<impl Iterator<Item = Option<T>>> {
        let bits = value::width(format);
        let base = self.start.as_ref().unwrap_or(start).to_wide(format)?;
        let delta = self.step.as_ref().unwrap_or(step).to_wide(format)?;
        Some(
            (0..self.count.unwrap_or(1))
                .map(move |i| T::from_wide(value::offset(base, delta, i, up, bits), format)),
        )
    }
}

/// Active variant of a pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternState<T> {
    Value(T),
    Values(Vec<T>),
    Auto(T),
    Increment(Counter<T>),
    Decrement(Counter<T>),
}

impl<T> PatternState<T> {
    pub fn choice(&self) -> PatternChoice {
        match self {
            PatternState::Value(_) => PatternChoice::Value,
            PatternState::Values(_) => PatternChoice::Values,
            PatternState::Auto(_) => PatternChoice::Auto,
            PatternState::Increment(_) => PatternChoice::Increment,
            PatternState::Decrement(_) => PatternChoice::Decrement,
        }
    }
}

/// Pattern field node for kind `K`.
#[derive(Debug, PartialEq)]
pub struct Pattern<K: PatternKind> {
    state: Option<PatternState<K::Value>>,
    /// Structural errors reported by setters or decoding; surfaced by the next validation.
    issues: Vec<String>,
    kind: PhantomData<K>,
}

impl<K: PatternKind> Default for Pattern<K> {
    fn default() -> Self {
        Pattern {
            state: None,
            issues: Vec::new(),
            kind: PhantomData,
        }
    }
}

impl<K: PatternKind> Pattern<K> {
    /// New pattern with the kind's default choice applied.
    pub fn new() -> Self {
        let mut obj = Self::default();
        obj.set_default();
        obj
    }

    fn counter_default() -> Counter<K::Value> {
        let mut c = Counter::new();
        c.set_default(K::default_value(), K::Value::unit_step(K::FORMAT));
        c
    }

    fn default_state(choice: PatternChoice) -> Option<PatternState<K::Value>> {
        match choice {
            PatternChoice::Value => Some(PatternState::Value(K::default_value())),
            PatternChoice::Values => Some(PatternState::Values(vec![K::default_value()])),
            PatternChoice::Auto => K::default_auto().map(PatternState::Auto),
            PatternChoice::Increment => Some(PatternState::Increment(Self::counter_default())),
            PatternChoice::Decrement => Some(PatternState::Decrement(Self::counter_default())),
            PatternChoice::Unspecified => None,
        }
    }

    /// Install a new active variant. Issues belong to the state they were recorded
    /// against, so they go with it.
    fn replace(&mut self, state: Option<PatternState<K::Value>>) {
        self.state = state;
        self.issues.clear();
    }

    fn invalid_choice(&mut self, choice: impl fmt::Display) {
        self.issues
            .push(format!("{} is not a valid choice on {}ChoiceEnum", choice, K::NAME));
    }

    pub fn choice(&self) -> Option<PatternChoice> {
        self.state.as_ref().map(PatternState::choice)
    }

    pub fn state(&self) -> Option<&PatternState<K::Value>> {
        self.state.as_ref()
    }

    /// Errors recorded since the state was last replaced.
    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    /// Select `choice`, populating it with its default literal. A choice the kind does not
    /// declare is recorded as an issue and leaves the state unchanged. Re-selecting the
    /// active choice keeps its data. A legal selection drops earlier issues.
    pub fn set_choice(&mut self, choice: PatternChoice) -> &mut Self {
        if !K::is_legal(choice) {
            self.invalid_choice(choice);
            return self;
        }
        if self.choice() == Some(choice) {
            self.issues.clear();
        } else {
            self.replace(Self::default_state(choice));
        }
        self
    }

    fn select(&mut self, choice: PatternChoice) -> Option<&mut PatternState<K::Value>> {
        self.set_choice(choice);
        self.state.as_mut().filter(|s| s.choice() == choice)
    }

    pub fn value(&self) -> Option<&K::Value> {
        match &self.state {
            Some(PatternState::Value(v)) => Some(v),
            _ => None,
        }
    }

    /// Switch to `value` if needed and return it.
    pub fn value_or_default(&mut self) -> &K::Value {
        if !matches!(self.state, Some(PatternState::Value(_))) {
            self.replace(Some(PatternState::Value(K::default_value())));
        }
        match &self.state {
            Some(PatternState::Value(v)) => v,
            _ => unreachable!("value state was just selected"),
        }
    }

    pub fn set_value(&mut self, v: K::Value) -> &mut Self {
        self.replace(Some(PatternState::Value(v)));
        self
    }

    pub fn values(&self) -> Option<&[K::Value]> {
        match &self.state {
            Some(PatternState::Values(v)) => Some(v),
            _ => None,
        }
    }

    /// Switch to `values` if needed and return the list for editing.
    pub fn values_or_default(&mut self) -> &mut Vec<K::Value> {
        if !matches!(self.state, Some(PatternState::Values(_))) {
            self.replace(Some(PatternState::Values(vec![K::default_value()])));
        }
        match &mut self.state {
            Some(PatternState::Values(v)) => v,
            _ => unreachable!("values state was just selected"),
        }
    }

    pub fn set_values(&mut self, v: Vec<K::Value>) -> &mut Self {
        self.replace(Some(PatternState::Values(v)));
        self
    }

    pub fn auto(&self) -> Option<&K::Value> {
        match &self.state {
            Some(PatternState::Auto(v)) => Some(v),
            _ => None,
        }
    }

    /// Switch to `auto` if the kind declares it; `None` (with an issue recorded) otherwise.
    pub fn auto_or_default(&mut self) -> Option<&K::Value> {
        match self.select(PatternChoice::Auto) {
            Some(PatternState::Auto(v)) => Some(v),
            _ => None,
        }
    }

    pub fn set_auto(&mut self, v: K::Value) -> &mut Self {
        if K::is_legal(PatternChoice::Auto) {
            self.replace(Some(PatternState::Auto(v)));
        } else {
            self.invalid_choice(PatternChoice::Auto);
        }
        self
    }

    pub fn increment(&self) -> Option<&Counter<K::Value>> {
        match &self.state {
            Some(PatternState::Increment(c)) => Some(c),
            _ => None,
        }
    }

    /// Switch to `increment` if needed and return the counter for editing.
    pub fn increment_or_default(&mut self) -> Option<&mut Counter<K::Value>> {
        match self.select(PatternChoice::Increment) {
            Some(PatternState::Increment(c)) => Some(c),
            _ => None,
        }
    }

    pub fn set_increment(&mut self, c: Counter<K::Value>) -> &mut Self {
        if K::is_legal(PatternChoice::Increment) {
            self.replace(Some(PatternState::Increment(c)));
        } else {
            self.invalid_choice(PatternChoice::Increment);
        }
        self
    }

    pub fn decrement(&self) -> Option<&Counter<K::Value>> {
        match &self.state {
            Some(PatternState::Decrement(c)) => Some(c),
            _ => None,
        }
    }

    /// Switch to `decrement` if needed and return the counter for editing.
    pub fn decrement_or_default(&mut self) -> Option<&mut Counter<K::Value>> {
        match self.select(PatternChoice::Decrement) {
            Some(PatternState::Decrement(c)) => Some(c),
            _ => None,
        }
    }

    pub fn set_decrement(&mut self, c: Counter<K::Value>) -> &mut Self {
        if K::is_legal(PatternChoice::Decrement) {
            self.replace(Some(PatternState::Decrement(c)));
        } else {
            self.invalid_choice(PatternChoice::Decrement);
        }
        self
    }

    /// Values this pattern yields, in application order. `None` for `auto` (chosen by the
    /// implementation), for an unset pattern and for a counter longer than
    /// [`MAX_EXPANSION`].
    pub fn expand(&self) -> Option<Vec<K::Value>> {
        let start = K::default_value();
        let step = K::Value::unit_step(K::FORMAT);
        match self.state.as_ref()? {
            PatternState::Value(v) => Some(vec![v.clone()]),
            PatternState::Values(v) => Some(v.clone()),
            PatternState::Auto(_) => None,
            PatternState::Increment(c) => c.expand(true, K::FORMAT, &start, &step),
            PatternState::Decrement(c) => c.expand(false, K::FORMAT, &start, &step),
        }
    }
}

impl<K: PatternKind> ObjectNode for Pattern<K> {
    type Msg = <K::Value as PatternScalar>::Record;
    const TYPE_NAME: &'static str = K::NAME;

    fn to_msg(&self) -> Self::Msg {
        let mut parts = PatternParts::default();
        if let Some(state) = &self.state {
            parts.choice = Some(state.choice().into());
            match state.clone() {
                PatternState::Value(v) => parts.value = Some(v),
                PatternState::Values(v) => parts.values = v,
                PatternState::Auto(v) => parts.auto = Some(v),
                PatternState::Increment(c) => parts.increment = Some(c),
                PatternState::Decrement(c) => parts.decrement = Some(c),
            }
        }
        K::Value::into_record(parts)
    }

    fn set_msg(&mut self, msg: Self::Msg) -> &mut Self {
        let parts = K::Value::from_record(msg);
        *self = Self::default();
        let tag = known_tag::<PatternChoice>(parts.choice, K::NAME, &mut self.issues);
        let mut populated = Vec::new();
        if parts.value.is_some() {
            populated.push(PatternChoice::Value);
        }
        if !parts.values.is_empty() {
            populated.push(PatternChoice::Values);
        }
        if parts.auto.is_some() {
            populated.push(PatternChoice::Auto);
        }
        if parts.increment.is_some() {
            populated.push(PatternChoice::Increment);
        }
        if parts.decrement.is_some() {
            populated.push(PatternChoice::Decrement);
        }
        let choice = match resolve_choice(tag, &populated, K::NAME, &mut self.issues) {
            Some(c) => c,
            None => return self,
        };
        if !K::is_legal(choice) {
            self.invalid_choice(choice);
            return self;
        }
        self.state = match choice {
            PatternChoice::Value => parts.value.map(PatternState::Value),
            PatternChoice::Values => Some(PatternState::Values(parts.values)),
            PatternChoice::Auto => parts.auto.map(PatternState::Auto),
            PatternChoice::Increment => parts.increment.map(PatternState::Increment),
            PatternChoice::Decrement => parts.decrement.map(PatternState::Decrement),
            PatternChoice::Unspecified => None,
        }
        .or_else(|| Self::default_state(choice));
        self
    }

    fn set_default(&mut self) {
        match &mut self.state {
            None => self.state = Self::default_state(K::DEFAULT_CHOICE),
            Some(PatternState::Increment(c)) | Some(PatternState::Decrement(c)) => {
                c.set_default(K::default_value(), K::Value::unit_step(K::FORMAT));
            }
            Some(_) => {}
        }
    }

    fn validate_obj(&self, vobj: &mut Validation) {
        for issue in &self.issues {
            vobj.error(issue.clone());
        }
        let state = match &self.state {
            Some(s) => s,
            None => return,
        };
        match state {
            PatternState::Value(v) => {
                if let Err(e) = v.check(K::FORMAT) {
                    vobj.error_at(e, K::NAME, "value");
                }
            }
            PatternState::Values(values) => {
                for (i, e) in constraint::check_each(values, |v| v.check(K::FORMAT)) {
                    vobj.error_at(e, K::NAME, &format!("values[{}]", i));
                }
            }
            PatternState::Auto(v) => {
                if let Err(e) = v.check(K::FORMAT) {
                    vobj.error_at(e, K::NAME, "auto");
                }
            }
            PatternState::Increment(c) | PatternState::Decrement(c) => {
                c.validate_obj(vobj, &format!("{}Counter", K::NAME), K::FORMAT);
            }
        }
    }
}

impl<K: PatternKind> fmt::Display for Pattern<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            None => write!(f, "{}(unset)", K::NAME),
            Some(s) => write!(f, "{}({})", K::NAME, s.choice().name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::pattern_kind! {
        Nibble(NibbleKind) {
            value: u32 = 7,
            format: Uint(4),
            default_choice: Value,
        }
    }

    crate::pattern_kind! {
        LowMac(LowMacKind) {
            value: String = "00:00:00:00:00:00",
            format: Mac,
            default_choice: Auto,
            auto: "00:00:00:00:00:01",
        }
    }

    #[test]
    fn constructor_applies_default_choice() {
        let p = Nibble::new();
        assert_eq!(p.choice(), Some(PatternChoice::Value));
        assert_eq!(p.value(), Some(&7));
        let m = LowMac::new();
        assert_eq!(m.choice(), Some(PatternChoice::Auto));
        assert_eq!(m.auto().map(String::as_str), Some("00:00:00:00:00:01"));
    }

    #[test]
    fn setters_clear_other_variants() {
        let mut p = Nibble::new();
        p.set_values(vec![1, 2, 3]);
        assert_eq!(p.choice(), Some(PatternChoice::Values));
        assert!(p.value().is_none());
        p.increment_or_default().unwrap().set_start(2);
        assert_eq!(p.choice(), Some(PatternChoice::Increment));
        assert!(p.values().is_none());
        assert_eq!(p.increment().unwrap().step(), Some(&1));
    }

    #[test]
    fn pure_getter_does_not_switch() {
        let mut p = Nibble::new();
        p.set_values(vec![3]);
        assert!(p.value().is_none());
        assert_eq!(p.choice(), Some(PatternChoice::Values));
        assert_eq!(*p.value_or_default(), 7);
        assert_eq!(p.choice(), Some(PatternChoice::Value));
    }

    #[test]
    fn illegal_choice_is_reported_not_applied() {
        let mut p = Nibble::new();
        p.set_value(3);
        p.set_choice(PatternChoice::Auto);
        assert_eq!(p.choice(), Some(PatternChoice::Value));
        assert_eq!(p.value(), Some(&3));
        let mut v = Validation::new();
        p.validate_obj(&mut v);
        assert_eq!(v.errors(), ["auto is not a valid choice on NibbleChoiceEnum"]);
    }

    #[test]
    fn legal_setter_drops_earlier_issues() {
        let mut p = Nibble::new();
        p.set_auto(1);
        assert_eq!(p.issues(), ["auto is not a valid choice on NibbleChoiceEnum"]);
        p.set_value(5);
        assert!(p.issues().is_empty());

        p.set_choice(PatternChoice::Auto);
        p.set_choice(PatternChoice::Value);
        assert!(p.issues().is_empty());
        assert_eq!(p.value(), Some(&5));

        p.set_choice(PatternChoice::Auto);
        p.increment_or_default().unwrap();
        assert!(p.issues().is_empty());
    }

    #[test]
    fn default_fill_keeps_decode_issues() {
        let mut p = Nibble::from_msg(msg::PatternUint {
            choice: Some(42),
            ..Default::default()
        });
        p.set_default();
        assert_eq!(p.issues(), ["42 is not a valid choice on NibbleChoiceEnum"]);
        assert_eq!(p.choice(), Some(PatternChoice::Value));
    }

    #[test]
    fn long_counter_is_not_materialized() {
        let mut p = Nibble::new();
        p.increment_or_default().unwrap().set_count(u32::MAX);
        assert_eq!(p.expand(), None);
        let c = p.increment().unwrap();
        let head: Vec<u32> = c
            .iter(true, Format::Uint { bits: 4 }, &7, &1)
            .unwrap()
            .take(3)
            .map(Option::unwrap)
            .collect();
        assert_eq!(head, [7, 8, 9]);

        p.increment_or_default().unwrap().set_count(MAX_EXPANSION);
        assert_eq!(p.expand().map(|v| v.len()), Some(MAX_EXPANSION as usize));
    }

    #[test]
    fn counter_expands_with_wrap() {
        let mut p = Nibble::new();
        p.increment_or_default().unwrap().set_start(14).set_step(1).set_count(4);
        assert_eq!(p.expand(), Some(vec![14, 15, 0, 1]));
        let mut m = LowMac::new();
        m.decrement_or_default().unwrap().set_start("00:00:00:00:01:00".into()).set_count(2);
        assert_eq!(
            m.expand(),
            Some(vec!["00:00:00:00:01:00".to_string(), "00:00:00:00:00:ff".to_string()])
        );
        assert_eq!(LowMac::new().expand(), None);
    }

    #[test]
    fn record_round_trip_keeps_state() {
        let mut p = Nibble::new();
        p.set_decrement({
            let mut c = Counter::new();
            c.set_start(9);
            c
        });
        let msg = p.to_msg();
        assert_eq!(msg.choice, Some(PatternChoice::Decrement.into()));
        let back = Nibble::from_msg(msg);
        assert_eq!(back.decrement().unwrap().start(), Some(&9));
        assert_eq!(back.decrement().unwrap().count(), None);
    }
}
