use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Image processing failed: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid argument '{value}': {reason}")]
    InvalidArgument { value: String, reason: String },

    #[error("Duplicate archive entry: {name}")]
    DuplicateEntry { name: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Image,
    Archive,
    Storage,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ResizeError {
    pub fn invalid_argument(value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::ProcessingError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArgument { .. } => ErrorCategory::Input,
            Self::ImageError(_) => ErrorCategory::Image,
            Self::ZipError(_) | Self::DuplicateEntry { .. } => ErrorCategory::Archive,
            Self::IoError(_) => ErrorCategory::Storage,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::SerializationError(_) | Self::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Image => ErrorSeverity::Medium,
            ErrorCategory::Archive | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "Dimensions must be non-negative pixel counts",
            Self::ImageError(_) => "Check that the file is a supported, uncorrupted image",
            Self::ZipError(_) => "Check free disk space and retry",
            Self::DuplicateEntry { .. } => "Rename one of the inputs so archive entries are unique",
            Self::IoError(_) => "Check that the paths exist and are readable/writable",
            Self::SerializationError(_) => "This is likely a bug; please report it",
            Self::ConfigValidationError { .. } => "Fix the configuration file syntax and try again",
            Self::InvalidConfigValueError { .. } | Self::MissingConfigError { .. } => {
                "Review the configuration values and try again"
            }
            Self::ProcessingError { .. } => "Make sure the inputs contain supported images",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidArgument { value, reason } => {
                format!("Invalid dimension {}: {}", value, reason)
            }
            Self::ImageError(e) => format!("Could not process image: {}", e),
            Self::IoError(e) => format!("File access failed: {}", e),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            Self::MissingConfigError { field } => format!("Setting '{}' is required", field),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ResizeError>;
