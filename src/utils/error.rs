use thiserror::Error;

#[derive(Error, Debug)]
pub enum HoursError {
    #[error("Failed to read dataset '{dataset}': {reason}")]
    DatasetReadError { dataset: String, reason: String },

    #[error("Dataset '{dataset}' is missing required columns: {}", missing.join(", "))]
    SchemaError {
        dataset: String,
        missing: Vec<String>,
    },

    #[error("No dataset yielded any valid row")]
    EmptyBatchError,

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Spreadsheet export failed: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV processing error: {0}")]
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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Output,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl HoursError {
    pub fn dataset_read(dataset: impl Into<String>, reason: impl ToString) -> Self {
        Self::DatasetReadError {
            dataset: dataset.into(),
            reason: reason.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DatasetReadError { .. } | Self::SchemaError { .. } => ErrorCategory::Input,
            Self::EmptyBatchError => ErrorCategory::Data,
            Self::ZipError(_) | Self::XlsxError(_) | Self::CsvError(_) => ErrorCategory::Output,
            Self::SerializationError(_) => ErrorCategory::Output,
            Self::IoError(_) => ErrorCategory::System,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // "no data" is a terminal state of the run, not a crash
            Self::EmptyBatchError => ErrorSeverity::Low,
            Self::DatasetReadError { .. } | Self::SchemaError { .. } => ErrorSeverity::Medium,
            Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::DatasetReadError { .. } => {
                "Check that the file is a readable CSV, TSV, JSON or Excel export".to_string()
            }
            Self::SchemaError { missing, .. } => format!(
                "Add the missing columns ({}) or adjust the [columns] section of the config",
                missing.join(", ")
            ),
            Self::EmptyBatchError => {
                "Upload at least one export that contains technician and duration values"
                    .to_string()
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Review the command line flags or the TOML configuration file".to_string()
            }
            Self::IoError(_) => "Check file permissions and available disk space".to_string(),
            _ => "Re-run with --verbose for details".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::EmptyBatchError => {
                "Uploaded files contained no valid data for processing.".to_string()
            }
            Self::SchemaError { dataset, missing } => {
                format!("Skipping {}: Missing columns {:?}", dataset, missing)
            }
            Self::DatasetReadError { dataset, reason } => {
                format!("Failed to process {}: {}", dataset, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn is_dataset_scoped(&self) -> bool {
        matches!(
            self,
            Self::DatasetReadError { .. } | Self::SchemaError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, HoursError>;
