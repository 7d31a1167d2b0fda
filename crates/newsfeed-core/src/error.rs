use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Datastore unavailable: {0}")]
    DatastoreUnavailable(String),

    #[error("Format error: {0}")]
    FormatError(String),

    #[error("Config error: {0}")]
    ConfigError(String),
}

#[cfg(feature = "dynamo")]
impl From<aws_sdk_dynamodb::Error> for AppError {
    fn from(e: aws_sdk_dynamodb::Error) -> Self {
        AppError::DatastoreUnavailable(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
