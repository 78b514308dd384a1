use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChopError {
    #[error("Invalid audio input: {0}")]
    InvalidAudioInput(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, ChopError>;
