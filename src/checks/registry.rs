//! Name-to-check dispatch

use std::collections::HashMap;

use crate::error::{CheckError, Result};
use crate::types::{OutcomeIssue, ValueSet};

/// A named validation routine over a resolved ValueSet.
///
/// Adding a check means implementing this trait and registering it; nothing
/// else in the pipeline changes.
pub trait Check: Send + Sync {
    fn name(&self) -> &'static str;

    /// Run the check, returning one issue record per finding.
    fn run(&self, value_set: &ValueSet) -> Vec<OutcomeIssue>;
}

/// Dispatch table mapping check names to implementations.
///
/// Populated once at startup so an unsupported name fails fast per request
/// instead of being discovered mid-pipeline.
pub struct CheckRegistry {
    checks: HashMap<&'static str, Box<dyn Check>>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self {
            checks: HashMap::new(),
        }
    }

    /// Registry preloaded with every built-in check.
    pub fn with_builtin_checks() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(super::CodeFormatCheck));
        registry
    }

    pub fn register(&mut self, check: Box<dyn Check>) {
        self.checks.insert(check.name(), check);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.checks.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checks.keys().copied()
    }

    /// Run the named check against the ValueSet.
    ///
    /// An unknown name is a configuration mismatch between the
    /// ActivityDefinition and this deployment, not a data problem.
    pub fn execute(&self, name: &str, value_set: &ValueSet) -> Result<Vec<OutcomeIssue>> {
        match self.checks.get(name) {
            Some(check) => Ok(check.run(value_set)),
            None => Err(CheckError::UnsupportedCheck(name.to_string())),
        }
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::with_builtin_checks()
    }
}

impl std::fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRegistry")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::assert_ok;

    fn empty_valueset() -> ValueSet {
        serde_json::from_value(json!({ "resourceType": "ValueSet" })).unwrap()
    }

    #[test]
    fn test_builtin_checks_are_registered() {
        let registry = CheckRegistry::with_builtin_checks();
        assert!(registry.contains("code-format"));
    }

    #[test]
    fn test_execute_known_check() {
        let registry = CheckRegistry::with_builtin_checks();
        assert_ok!(registry.execute("code-format", &empty_valueset()));
    }

    #[test]
    fn test_unknown_check_is_unsupported() {
        let registry = CheckRegistry::with_builtin_checks();
        let err = registry
            .execute("no-such-check", &empty_valueset())
            .unwrap_err();
        assert!(matches!(err, CheckError::UnsupportedCheck(_)));
        assert_eq!(
            err.to_string(),
            "Unsupported check in ActivityDefinition: no-such-check"
        );
    }

    #[test]
    fn test_registry_is_open_for_extension() {
        struct AlwaysClean;

        impl Check for AlwaysClean {
            fn name(&self) -> &'static str {
                "always-clean"
            }

            fn run(&self, _value_set: &ValueSet) -> Vec<OutcomeIssue> {
                Vec::new()
            }
        }

        let mut registry = CheckRegistry::with_builtin_checks();
        registry.register(Box::new(AlwaysClean));

        assert!(registry.contains("always-clean"));
        assert!(registry
            .execute("always-clean", &empty_valueset())
            .unwrap()
            .is_empty());
    }
}
