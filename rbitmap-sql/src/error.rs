use rbitmap::FormatError;
use thiserror::Error;

/// The failure of one function call or one aggregate group.
///
/// The `Display` text is what the host reports as the query error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionError {
    #[error("invalid argument: {0}")]
    Argument(String),
    #[error("invalid bitmap: {0}")]
    Format(#[from] FormatError),
    #[error("invalid bitmap: {function} does not accept NULL")]
    NullOperand { function: String },
    #[error("no such function: {0}")]
    UnknownFunction(String),
    #[error("wrong number of arguments to function {function}: expected {expected}, found {found}")]
    Arity {
        function: String,
        expected: usize,
        found: usize,
    },
    #[error("{function} is not {expected}")]
    WrongKind {
        function: String,
        expected: &'static str,
    },
}

impl FunctionError {
    pub(crate) fn argument(function: &str, detail: impl std::fmt::Display) -> Self {
        FunctionError::Argument(format!("{function}: {detail}"))
    }
}
