//! Dispatch error types.
//!
//! Resolution walks several fallback paths, and a failure on one path is
//! ordinarily just a recorded diagnostic, not a hard stop. [`DispatchErrors`]
//! accumulates those diagnostics; the terminal [`DispatchError`] variants
//! carry the whole collection so the caller sees every overload that was
//! tried and why each failed, not only the last attempt.

use thiserror::Error;

/// Failure reported by the marshaling/execution layer for one candidate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvokeError {
    /// An argument could not be converted to the declared parameter type.
    #[error("could not convert argument {index} from '{from}' to '{to}'")]
    ArgumentConversion {
        /// Zero-based argument position.
        index: usize,
        /// The runtime type offered.
        from: String,
        /// The declared parameter type.
        to: String,
    },

    /// The method requires a bound receiver and none was available.
    #[error("instance method called without a bound receiver")]
    MissingReceiver,

    /// The native call itself failed.
    #[error("{0}")]
    Execution(String),
}

/// One recorded resolution failure, or a terminal dispatch error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// The type-information service found nothing for a prototype.
    /// Recoverable: the next path is tried (except on the explicit path).
    #[error("failed to instantiate \"{name}({proto})\"")]
    LookupMiss {
        /// The requested (possibly templated) method name.
        name: String,
        /// The argument prototype that was offered.
        proto: String,
    },

    /// The requested name is occupied by an unrelated member of an
    /// unrecognized kind; instantiation aborts without touching it.
    #[error("member '{name}' exists with an unrecognized kind and was left alone")]
    AmbiguousMember {
        /// The occupied member name.
        name: String,
    },

    /// One candidate overload matched by name but failed to convert or run.
    #[error("{signature} => {source}")]
    CandidateFailed {
        /// Declared signature of the failed candidate.
        signature: String,
        /// The underlying failure.
        source: InvokeError,
    },

    /// Terminal failure of an explicit template selection. Explicit requests
    /// never fall through to inference, so this surfaces immediately.
    #[error("could not find \"{name}\":\n{errors}")]
    ExplicitInstantiationFailed {
        /// The fully qualified attempted name, template arguments included.
        name: String,
        /// Everything that was tried under that name.
        errors: DispatchErrors,
    },

    /// Every path failed; the collection holds one entry per attempt.
    #[error("template method resolution failed:\n{0}")]
    ResolutionExhausted(DispatchErrors),

    /// No path produced so much as a recorded failure.
    #[error("cannot resolve method template call for '{0}'")]
    Unresolvable(String),
}

/// An ordered collection of recorded resolution failures.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DispatchErrors {
    errors: Vec<DispatchError>,
}

impl DispatchErrors {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one failure.
    pub fn push(&mut self, error: DispatchError) {
        self.errors.push(error);
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over the recorded failures in order.
    pub fn iter(&self) -> impl Iterator<Item = &DispatchError> {
        self.errors.iter()
    }

    /// Consume into the underlying vector.
    pub fn into_vec(self) -> Vec<DispatchError> {
        self.errors
    }
}

impl IntoIterator for DispatchErrors {
    type Item = DispatchError;
    type IntoIter = std::vec::IntoIter<DispatchError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl From<DispatchError> for DispatchErrors {
    fn from(error: DispatchError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl std::fmt::Display for DispatchErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {error}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_miss_display() {
        let err = DispatchError::LookupMiss {
            name: "sum<int>".into(),
            proto: "int, int".into(),
        };
        assert_eq!(
            format!("{err}"),
            "failed to instantiate \"sum<int>(int, int)\""
        );
    }

    #[test]
    fn candidate_failed_display() {
        let err = DispatchError::CandidateFailed {
            signature: "double".into(),
            source: InvokeError::ArgumentConversion {
                index: 0,
                from: "long".into(),
                to: "double".into(),
            },
        };
        assert_eq!(
            format!("{err}"),
            "double => could not convert argument 0 from 'long' to 'double'"
        );
    }

    #[test]
    fn composite_display_lists_every_attempt() {
        let mut errors = DispatchErrors::new();
        errors.push(DispatchError::LookupMiss {
            name: "f".into(),
            proto: "long".into(),
        });
        errors.push(DispatchError::CandidateFailed {
            signature: "void*".into(),
            source: InvokeError::Execution("boom".into()),
        });
        let err = DispatchError::ResolutionExhausted(errors);
        let text = format!("{err}");
        assert!(text.starts_with("template method resolution failed:"));
        assert!(text.contains("failed to instantiate \"f(long)\""));
        assert!(text.contains("void* => boom"));
    }

    #[test]
    fn collection_basics() {
        let mut errors = DispatchErrors::new();
        assert!(errors.is_empty());
        errors.push(DispatchError::Unresolvable("f".into()));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.into_vec().len(), 1);
    }
}
