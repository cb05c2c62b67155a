use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShopError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Content backend error: {message}")]
    ContentError { message: String },

    #[error("Postcode not found: {postcode}")]
    PostcodeNotFound { postcode: String },

    #[error("Postcode lookup failed for {postcode}: {message}")]
    PostcodeLookupError { postcode: String, message: String },

    #[error("Checkout is incomplete: {}", .errors.join("; "))]
    CheckoutValidationError { errors: Vec<String> },

    #[error("Order submission via {channel} failed: {message}")]
    OrderSubmissionError { channel: String, message: String },

    #[error("Cart error: {message}")]
    CartError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Storage,
    Input,
    Submission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ShopError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ShopError::ApiError(_)
            | ShopError::ContentError { .. }
            | ShopError::PostcodeLookupError { .. } => ErrorCategory::Network,
            ShopError::ConfigError { .. }
            | ShopError::ConfigValidationError { .. }
            | ShopError::InvalidConfigValueError { .. }
            | ShopError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ShopError::CsvError(_)
            | ShopError::IoError(_)
            | ShopError::SerializationError(_)
            | ShopError::CartError { .. } => ErrorCategory::Storage,
            ShopError::PostcodeNotFound { .. }
            | ShopError::CheckoutValidationError { .. }
            | ShopError::ValidationError { .. } => ErrorCategory::Input,
            ShopError::OrderSubmissionError { .. } => ErrorCategory::Submission,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 使用者可以修正輸入後重試
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Submission => ErrorSeverity::Medium,
            ErrorCategory::Storage => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ShopError::ApiError(_) | ShopError::ContentError { .. } => {
                "Check your network connection and the content project settings".to_string()
            }
            ShopError::PostcodeNotFound { .. } => {
                "Double-check the postcode, e.g. 'SW1A 1AA'".to_string()
            }
            ShopError::PostcodeLookupError { .. } => {
                "The postcode service is unavailable, try again in a moment".to_string()
            }
            ShopError::CheckoutValidationError { .. } | ShopError::ValidationError { .. } => {
                "Correct the highlighted details and try again".to_string()
            }
            ShopError::OrderSubmissionError { .. } => {
                "Send the order by message instead: run checkout with --channel messaging"
                    .to_string()
            }
            ShopError::ConfigError { .. }
            | ShopError::ConfigValidationError { .. }
            | ShopError::InvalidConfigValueError { .. }
            | ShopError::MissingConfigError { .. } => {
                "Review the configuration file and environment variables".to_string()
            }
            ShopError::CsvError(_) | ShopError::IoError(_) => {
                "Check that the storage directory exists and is writable".to_string()
            }
            ShopError::SerializationError(_) | ShopError::CartError { .. } => {
                "Clear the basket with `cart clear` and add the items again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ShopError::ApiError(_) | ShopError::ContentError { .. } => {
                "We couldn't reach the shop's content right now.".to_string()
            }
            ShopError::PostcodeNotFound { postcode } => {
                format!("We couldn't find the postcode '{}'.", postcode)
            }
            ShopError::PostcodeLookupError { .. } => {
                "We couldn't check your postcode right now.".to_string()
            }
            ShopError::CheckoutValidationError { errors } => {
                format!("Please fix the following: {}", errors.join("; "))
            }
            ShopError::OrderSubmissionError { .. } => {
                "We couldn't send your order by email. You can still send it to us by message."
                    .to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShopError>;
