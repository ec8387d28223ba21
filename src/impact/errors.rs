use thiserror::Error;

/// Per-event resolution errors.
///
/// These are local to one change event: the dispatcher logs and skips the
/// event, and the stream continues. Keys are rejected before any SQL text is
/// built, so a malformed key can never reach a generated statement.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ImpactError {
    #[error("key value {value} is not an integer")]
    InvalidKey { value: String },
    #[error("change event carried no key values")]
    EmptyKeys,
}
