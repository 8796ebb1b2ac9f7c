use std::sync::PoisonError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FactoryError {

    #[error("No constructor of {target} takes ({params}), available: [{available}]")]
    NoMatchingConstructor { target: &'static str, params: String, available: String },

    #[error("Ambiguous constructor {signature}: registered by {candidates}")]
    AmbiguousConstructor { signature: String, candidates: String },

    #[error("{signature} expects {expected} argument(s), got {actual}")]
    ArgumentCountMismatch { signature: String, expected: usize, actual: usize },

    #[error("Argument {index} of {signature} must be {expected}, got {actual}")]
    ArgumentTypeMismatch { signature: String, index: usize, expected: &'static str, actual: &'static str },

    #[error("Factory shape {shape} returns no value")]
    InvalidFactoryShape { shape: &'static str },

    #[error("Factory shape {shape} does not fit {signature}: {reason}")]
    SignatureMismatch { shape: &'static str, signature: String, reason: String },

    #[error("Constructor failed: {0}")]
    Construction(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Poison error: {0}")]
    Poisoned(String),
}

impl FactoryError {
    /// Wraps the error of a fallible `#[ctor]`, plain `String`/`&str` messages included.
    pub fn construction<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        FactoryError::Construction(err.into())
    }
}

impl<T> From<PoisonError<T>> for FactoryError
{
    fn from(e: PoisonError<T>) -> Self {
        FactoryError::Poisoned(format!("{:?}", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Error)]
    #[error("negative radius")]
    struct NegativeRadius;

    #[test]
    fn construction_error_keeps_source() {
        let err = FactoryError::construction(NegativeRadius);
        assert_eq!(err.to_string(), "Constructor failed: negative radius");
        let source = std::error::Error::source(&err).expect("source must be preserved");
        assert_eq!(source.to_string(), "negative radius");
    }

    #[test]
    fn construction_accepts_string_messages() {
        let owned = FactoryError::construction(format!("percent {} out of range", 140));
        assert_eq!(owned.to_string(), "Constructor failed: percent 140 out of range");
        let borrowed = FactoryError::construction("empty name");
        match borrowed {
            FactoryError::Construction(source) => assert_eq!(source.to_string(), "empty name"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn poisoned_lock_converts() {
        let lock = Arc::new(Mutex::new(0));
        let cloned = Arc::clone(&lock);
        let _ = std::thread::spawn(move || {
            let _guard = cloned.lock().unwrap();
            panic!("poison it");
        }).join();
        let err: FactoryError = lock.lock().unwrap_err().into();
        assert!(matches!(err, FactoryError::Poisoned(_)));
    }
}
