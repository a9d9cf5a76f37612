use thiserror::Error;

/// Reasons a raw message is not a usable [`crate::Command`].
#[derive(Error, Debug)]
pub enum ContractError {
    #[error("message has no string `type` field")]
    MissingType,

    #[error("unknown command type `{0}`")]
    UnknownCommand(String),

    #[error("malformed {kind} command: {source}")]
    Malformed {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
