use thiserror::Error;

/// Error type for content decoding and challenge navigation.
///
/// Preparing an already decoded tree never fails; these errors only surface
/// at the JSON boundary or when a caller asks for a challenge that does not
/// exist.
#[derive(Debug, Error)]
pub enum PrepareError {
  #[error("Invalid content node: {0}")]
  InvalidNode(String),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Challenge index {index} is out of range ({total} challenges)")]
  ChallengeOutOfRange { index: usize, total: usize },
}

/// Result type for content operations.
pub type PrepareResult<T> = Result<T, PrepareError>;
