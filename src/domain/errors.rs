use thiserror::Error;

/// A dot-path insertion collided with a value already stored in the field tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field `{path}` conflicts with the existing value at `{existing}`")]
pub struct FieldConflict {
    /// The full path that was being inserted.
    pub path: String,
    /// The prefix of `path` that is already occupied.
    pub existing: String,
}

/// Errors that abort building a request from command-line tokens.
///
/// No request is produced when one of these is returned.
#[derive(Debug, Error)]
pub enum BuildError {
    /// No host was given after the optional method.
    #[error("missing host: expected `[METHOD] HOST [ITEM...]`")]
    MissingHost,

    /// The normalized host string is not a valid URL.
    #[error("invalid host '{host}': {source}")]
    HostParse {
        host: String,
        #[source]
        source: url::ParseError,
    },

    /// A field token collided with an earlier one.
    #[error("argument '{token}': {source}")]
    FieldConflict {
        token: String,
        #[source]
        source: FieldConflict,
    },

    /// A header token whose name or value is not valid HTTP.
    #[error("argument '{token}': invalid header: {reason}")]
    InvalidHeader { token: String, reason: String },

    /// The field tree could not be encoded as JSON.
    #[error("failed to encode JSON body: {0}")]
    Serialize(#[from] serde_json::Error),
}
