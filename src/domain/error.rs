//! Fatal analysis errors. Any of these aborts the run before edges are emitted.

use thiserror::Error;

/// Errors that stop a run during project load.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A source unit is not syntactically valid.
    #[error("failed to parse {unit}: {source}")]
    Parse {
        /// Identifier of the unit that failed.
        unit: String,
        /// Front-end failure.
        #[source]
        source: anyhow::Error,
    },

    /// An external symbol table could not be loaded.
    #[error("missing external reference {reference}: {source}")]
    MissingReference {
        /// Name of the reference that failed.
        reference: String,
        /// Front-end failure.
        #[source]
        source: anyhow::Error,
    },
}

impl AnalysisError {
    /// Creates a new `Parse` error.
    pub fn parse(unit: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Parse {
            unit: unit.into(),
            source,
        }
    }

    /// Creates a new `MissingReference` error.
    pub fn missing_reference(reference: impl Into<String>, source: anyhow::Error) -> Self {
        Self::MissingReference {
            reference: reference.into(),
            source,
        }
    }

    /// Unit or reference the error is about.
    pub fn subject(&self) -> &str {
        match self {
            Self::Parse { unit, .. } => unit,
            Self::MissingReference { reference, .. } => reference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_subject() {
        let err = AnalysisError::parse("src/a.rs", anyhow::anyhow!("3:7: expected `;`"));
        assert_eq!(err.to_string(), "failed to parse src/a.rs: 3:7: expected `;`");
        assert_eq!(err.subject(), "src/a.rs");

        let err = AnalysisError::missing_reference("console", anyhow::anyhow!("not found"));
        assert!(err.to_string().starts_with("missing external reference console"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
