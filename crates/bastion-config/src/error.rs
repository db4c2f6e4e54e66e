use thiserror::Error;

/// Errors raised while loading workflow definitions or settings.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// Input was not valid JSON or did not match the expected shape.
  #[error("failed to parse input")]
  Parse(#[from] serde_json::Error),

  /// Input parsed, but is neither a node array nor an object with a `nodes` array.
  #[error("input is not a valid node collection: {0}")]
  NotANodeCollection(String),

  /// Settings file could not be read.
  #[error("failed to read {path}")]
  Io {
    path: String,
    #[source]
    source: std::io::Error,
  },
}
