use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("pattern set cannot be empty")]
    EmptyPatternSet,
    #[error("invalid pattern #{index}: {message}")]
    InvalidPattern { index: usize, message: String },
    #[error("phone number is required")]
    EmptyPhoneNumber,
}

pub type Result<T> = std::result::Result<T, CoreError>;
