//! Evaluation errors.

use smol_str::SmolStr;
use thiserror::Error;

/// Why evaluating an expression failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("division by zero in '{0}'")]
    DivisionByZero(SmolStr),
    #[error("type mismatch in '{op}': {detail}")]
    TypeMismatch { op: SmolStr, detail: String },
    #[error("'{name}' expects {expected} argument(s), got {found}")]
    ArgumentCount {
        name: SmolStr,
        expected: &'static str,
        found: usize,
    },
    #[error("integer overflow in '{0}'")]
    Overflow(SmolStr),
    #[error("substring bounds {lo}..{hi} are invalid for a string of length {len}")]
    SubstringBounds { lo: i64, hi: i64, len: usize },
    #[error("range step must be positive, got {0}")]
    InvalidStep(i64),
    #[error("range {start}..{stop} step {step} has too many elements")]
    RangeTooLarge { start: i64, stop: i64, step: i64 },
    #[error("cannot resolve '{0}'")]
    UnresolvedName(String),
    #[error("no built-in function '{0}'")]
    UnknownFunction(String),
    #[error("'{0}' has no value that can be computed from the model")]
    NotEvaluable(String),
    #[error("call depth exceeded while evaluating '{0}'")]
    RecursionLimit(String),
}

impl EvalError {
    pub(crate) fn mismatch(op: &str, detail: impl Into<String>) -> Self {
        EvalError::TypeMismatch {
            op: op.into(),
            detail: detail.into(),
        }
    }

    /// Whether the failure is a defect of the expression itself rather than
    /// a value that is only known at run time.
    pub fn is_static_failure(&self) -> bool {
        !matches!(self, EvalError::NotEvaluable(_))
    }
}
