// Canonical routine identity used as call graph node.

/// Caller used for calls that sit outside any routine declaration.
pub const MODULE_LEVEL: &str = "<module-level>";
/// Callee used when a call target cannot be statically determined.
pub const UNRESOLVED: &str = "<unresolved>";

/// Canonical identity of a routine: its fully qualified display string,
/// including owner type/namespace and parameter types.
///
/// Two symbols are the same graph node iff their display strings are equal.
/// Distinct routines that render identically are therefore merged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(display: impl Into<String>) -> Self {
        Self(display.into())
    }

    pub fn module_level() -> Self {
        Self(MODULE_LEVEL.to_string())
    }

    pub fn unresolved() -> Self {
        Self(UNRESOLVED.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the `<module-level>` and `<unresolved>` placeholders.
    pub fn is_sentinel(&self) -> bool {
        self.0 == MODULE_LEVEL || self.0 == UNRESOLVED
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_display_string() {
        assert_eq!(Symbol::new("A::f()"), Symbol::new(String::from("A::f()")));
        assert_ne!(Symbol::new("A::f()"), Symbol::new("A::f(i32)"));
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(Symbol::module_level().as_str(), "<module-level>");
        assert_eq!(Symbol::unresolved().to_string(), "<unresolved>");
        assert!(Symbol::unresolved().is_sentinel());
        assert!(!Symbol::new("A::f()").is_sentinel());
    }
}
