use thiserror::Error;

/// Main error type for the pairstack library
#[derive(Error, Debug)]
pub enum CombinerError {
    #[error("Slot error: {0}")]
    Slot(#[from] SlotError),

    #[error("Compose error: {0}")]
    Compose(#[from] ComposeError),

    #[error("Save error: {0}")]
    Save(#[from] SaveError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Generic(String),
}

/// Errors raised while loading a slot from a directory
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Directory not found or not readable: {path}")]
    DirectoryNotFound { path: String },
}

/// Errors raised while composing a pair of images
#[derive(Error, Debug)]
pub enum ComposeError {
    /// Expected whenever one or both slots are still empty. Not a fault;
    /// the presentation layer should prompt for the missing folder(s).
    #[error("Both slots must be loaded before composing")]
    NotReady,

    #[error("Failed to decode image: {path}")]
    DecodeFailed { path: String },
}

/// Errors raised while writing a composite to disk
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Unsupported output format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Failed to write {path}: {reason}")]
    WriteFailed { path: String, reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },
}

/// Convenience type alias for Results using CombinerError
pub type Result<T> = std::result::Result<T, CombinerError>;

impl CombinerError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Slot(SlotError::DirectoryNotFound { path }) => {
                format!("Could not read folder '{}'. Please check it exists.", path)
            }
            Self::Compose(ComposeError::NotReady) => {
                "Please load both folders before combining.".to_string()
            }
            Self::Compose(ComposeError::DecodeFailed { path }) => {
                format!("Could not open image '{}'. The file may be corrupt or not an image.", path)
            }
            Self::Save(SaveError::UnsupportedFormat { format }) => {
                format!("Cannot save as '{}'. Supported formats: png, jpg, jpeg.", format)
            }
            _ => self.to_string(),
        }
    }
}
