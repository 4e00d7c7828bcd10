use thiserror::Error;

#[derive(Debug, Error)]
pub enum RlzipError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid format: {0}")]
    InvalidFormat(&'static str),
    #[error("pipeline error: {0}")]
    Pipeline(String),
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<RlzipError>,
    },
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl RlzipError {
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}
