#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("invalid layout input: {0}")]
    InvalidInput(#[source] serde_json::Error),
    #[error("invalid layout config: `{field}` {reason}")]
    InvalidConfig { field: &'static str, reason: &'static str },
    #[error("failed to serialize layout: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
