/// Core error type for the relay.
///
/// Adapter crates map their specific errors into this type so the relay can log
/// failures consistently before dropping the message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("translation failed: {status} {body}")]
    Translation { status: u16, body: String },

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
