use thiserror::Error;

pub type LeadResult<T> = Result<T, LeadError>;

#[derive(Error, Debug)]
pub enum LeadError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Store(String),

    #[error("Lead validation error: {0}")]
    Validation(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl From<config::ConfigError> for LeadError {
    fn from(err: config::ConfigError) -> Self {
        LeadError::Config(err.to_string())
    }
}
