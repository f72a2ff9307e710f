//! Configuration error taxonomy.
//!
//! All variants are construction-time failures: they abort a run before the
//! first tick executes. Runtime numeric edge cases are recovered locally in
//! the components that detect them and never surface here; missed Pk rolls,
//! lost locks and exhausted ammunition are ordinary state transitions, not
//! errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("duplicate entity id `{0}`")]
    DuplicateId(String),

    #[error("entity `{entity}` references unknown entity `{referent}` ({context})")]
    UnknownReference {
        entity: String,
        referent: String,
        context: &'static str,
    },

    #[error("entity `{entity}`: {what} = {value} is out of range")]
    ParameterOutOfRange {
        entity: String,
        what: &'static str,
        value: f64,
    },

    #[error("invalid run configuration: {0}")]
    InvalidRunConfig(&'static str),
}
