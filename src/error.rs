use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgendoError {
    #[error("Input closed")]
    InputClosed,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wrong argument '{0}', should be a number")]
    NotANumber(String),

    #[error("Wrong formatting")]
    WrongFormatting,

    #[error("{0}")]
    Command(String),
}
