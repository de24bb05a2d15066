use thiserror::Error;

/// Errors from the fix feed.
///
/// Message-level variants are logged and the message dropped; the transport
/// variants end or restart the connection.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Line has no payload: '{line}'")]
    MalformedLine { line: String },

    #[error("Topic '{topic}' is not <namespace>/train/<vehicle>/<kind>")]
    MalformedTopic { topic: String },

    #[error("Invalid fix payload on '{topic}': {source}")]
    Payload {
        topic: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Feed read error: {0}")]
    Read(#[from] std::io::Error),

    #[error("Gave up reconnecting to {address} after {attempts} attempts")]
    ReconnectExhausted { address: String, attempts: u32 },
}
