//! Validation accumulator shared by one traversal of an object tree.
//!
//! Nodes never return early on a bad field: they append to the accumulator and keep walking,
//! so a single call reports every problem in the tree. [`Validation::finish`] turns the
//! collected state into one pass/fail result.

use std::collections::{HashMap, HashSet};
use std::fmt;

/// Every error collected by a failed validation, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .messages.join("\n"))]
pub struct ValidationError {
    pub messages: Vec<String>,
}

impl ValidationError {
    /// True if any message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.contains(needle))
    }
}

/// A name reference that must resolve once the whole tree has been walked.
#[derive(Debug, Clone)]
struct PendingReference {
    value: String,
    target: &'static str,
    location: String,
}

/// Mutable bag of errors and warnings for one traversal.
#[derive(Debug, Default)]
pub struct Validation {
    errors: Vec<String>,
    warnings: Vec<String>,
    /// Declared names per scope (e.g. "Port" -> {"p1", "p2"}).
    names: HashMap<&'static str, HashSet<String>>,
    references: Vec<PendingReference>,
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Record `<message> on <type_name>.<field>`.
    pub fn error_at(&mut self, message: impl fmt::Display, type_name: &str, field: &str) {
        self.errors.push(format!("{} on {}.{}", message, type_name, field));
    }

    /// Record a missing required field.
    pub fn required(&mut self, field: &str, type_name: &str) {
        self.errors
            .push(format!("{} is required field on interface {}", field, type_name));
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Record a deprecated field that is in use.
    pub fn deprecated(&mut self, field: &str, type_name: &str, note: &str) {
        self.warn(format!(
            "{} property in schema {} is deprecated, {}",
            field, type_name, note
        ));
    }

    /// Open `scope` with no names yet. References into a scope are checked only when the
    /// walk has opened or populated it, so a subtree validated on its own defers them to
    /// the node that owns the scope.
    pub fn scope(&mut self, scope: &'static str) {
        self.names.entry(scope).or_default();
    }

    /// Declare `name` in `scope`; a second declaration is an error.
    pub fn unique(&mut self, scope: &'static str, name: &str) {
        let seen = self.names.entry(scope).or_default();
        if !seen.insert(name.to_string()) {
            self.errors
                .push(format!("{} with name {} already exists", scope, name));
        }
    }

    /// `value` must name something declared in `target` somewhere in the tree. Skipped if
    /// `target` is not in scope for this walk (see [`Validation::scope`]).
    pub fn reference(&mut self, value: &str, target: &'static str, type_name: &str, field: &str) {
        self.references.push(PendingReference {
            value: value.to_string(),
            target,
            location: format!("{}.{}", type_name, field),
        });
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn resolve_references(&mut self) {
        for r in std::mem::take(&mut self.references) {
            let names = match self.names.get(r.target) {
                Some(names) => names,
                None => continue,
            };
            if !names.contains(&r.value) {
                self.errors.push(format!(
                    "{} is not a valid reference to {}.name on {}",
                    r.value, r.target, r.location
                ));
            }
        }
    }

    /// Resolve pending references and produce the final result. Warnings are logged and
    /// returned on success; they never fail validation.
    pub fn finish(mut self) -> Result<Vec<String>, ValidationError> {
        self.resolve_references();
        for w in &self.warnings {
            tracing::warn!(warning = %w, "validation warning");
        }
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            tracing::debug!(count = self.errors.len(), "validation failed");
            Err(ValidationError {
                messages: self.errors,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_accumulator_passes() {
        let v = Validation::new();
        assert!(v.is_valid());
        assert_eq!(v.finish().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn errors_keep_insertion_order() {
        let mut v = Validation::new();
        v.error_at("min 0 max 255 but got 300", "PatternFlowIpv4TimeToLive", "value");
        v.required("name", "Port");
        v.error("free form");
        let err = v.finish().unwrap_err();
        assert_eq!(
            err.messages,
            vec![
                "min 0 max 255 but got 300 on PatternFlowIpv4TimeToLive.value".to_string(),
                "name is required field on interface Port".to_string(),
                "free form".to_string(),
            ]
        );
        assert_eq!(err.to_string().lines().count(), 3);
    }

    #[test]
    fn warnings_do_not_fail() {
        let mut v = Validation::new();
        v.deprecated("pfc_queue", "FlowEthernet", "it will be removed");
        let warnings = v.finish().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("pfc_queue property in schema FlowEthernet is deprecated"));
    }

    #[test]
    fn duplicate_names_in_same_scope() {
        let mut v = Validation::new();
        v.unique("Port", "p1");
        v.unique("Flow", "p1");
        v.unique("Port", "p1");
        let err = v.finish().unwrap_err();
        assert_eq!(err.messages, vec!["Port with name p1 already exists".to_string()]);
    }

    #[test]
    fn references_resolve_after_walk() {
        let mut v = Validation::new();
        // referenced before declared: still resolves
        v.reference("p2", "Port", "FlowPort", "tx_name");
        v.reference("p9", "Port", "FlowPort", "rx_names[0]");
        v.unique("Port", "p2");
        let err = v.finish().unwrap_err();
        assert_eq!(
            err.messages,
            vec!["p9 is not a valid reference to Port.name on FlowPort.rx_names[0]".to_string()]
        );
    }

    #[test]
    fn references_outside_the_walk_are_deferred() {
        let mut v = Validation::new();
        v.reference("p1", "Port", "FlowPort", "tx_name");
        assert!(v.finish().is_ok());

        let mut v = Validation::new();
        v.scope("Port");
        v.reference("p1", "Port", "FlowPort", "tx_name");
        let err = v.finish().unwrap_err();
        assert_eq!(
            err.messages,
            vec!["p1 is not a valid reference to Port.name on FlowPort.tx_name".to_string()]
        );
    }
}
