//! Errors raised by the dynamic enum table

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("enum `{enum_name}` has no case named `{name}`")]
    UnknownCase { enum_name: String, name: String },

    #[error("enum `{enum_name}` declares case `{name}` more than once")]
    DuplicateCase { enum_name: String, name: String },

    #[error("enum `{enum_name}` declares method `{name}` more than once")]
    DuplicateMethod { enum_name: String, name: String },

    #[error("enum `{enum_name}` declares static `{name}` more than once")]
    DuplicateStatic { enum_name: String, name: String },

    #[error("static `{name}` of enum `{enum_name}` collides with the case of the same name")]
    StaticCollision { enum_name: String, name: String },

    #[error("`{0}` is not a valid name")]
    InvalidName(String),

    #[error("enum `{0}` declares no cases")]
    NoCases(String),

    #[error("case `{case}` takes at most {expected} argument(s) but {got} were supplied")]
    TooManyArguments {
        case: String,
        expected: usize,
        got: usize,
    },

    #[error("case `{0}` requires a payload")]
    MissingPayload(String),

    #[error("case `{case}` expects {expected} payload, found {found}")]
    PayloadMismatch {
        case: String,
        expected: String,
        found: &'static str,
    },

    #[error("expected case `{expected}`, found `{found}`")]
    CaseMismatch { expected: String, found: String },

    #[error("enum `{enum_name}` has no method `{name}`")]
    UnknownMethod { enum_name: String, name: String },

    #[error("enum `{enum_name}` has no static `{name}`")]
    UnknownStatic { enum_name: String, name: String },

    #[error("static `{0}` is a value, not a function")]
    NotCallable(String),

    #[error("static `{0}` is a function, not a value")]
    NotAValue(String),

    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Error raised from inside a behavior method or static function.
    pub fn custom(message: impl Into<String>) -> Self {
        Error::Custom(message.into())
    }
}
