use thiserror::Error;

#[derive(Error, Debug)]
pub enum InitError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Cannot read SQL file {path}: {source}")]
    SqlFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Secret retrieval failed: {message}")]
    SecretRetrievalError { message: String },

    #[error("Malformed secret: {message}")]
    MalformedSecretError { message: String },

    #[error("Statement {index} in {file} failed: {source}")]
    StatementError {
        file: String,
        index: usize,
        #[source]
        source: sqlx::Error,
    },
}

pub type Result<T> = std::result::Result<T, InitError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Secret,
    Database,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl InitError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            InitError::ConfigError { .. }
            | InitError::MissingConfigError { .. }
            | InitError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            InitError::SecretRetrievalError { .. }
            | InitError::MalformedSecretError { .. } => ErrorCategory::Secret,
            InitError::DatabaseError(_) | InitError::StatementError { .. } => {
                ErrorCategory::Database
            }
            InitError::IoError(_) | InitError::SqlFileError { .. } => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 連線中斷可以重新呼叫
            InitError::DatabaseError(sqlx::Error::Io(_))
            | InitError::DatabaseError(sqlx::Error::PoolTimedOut)
            | InitError::SecretRetrievalError { .. } => ErrorSeverity::Medium,
            InitError::StatementError { .. } | InitError::DatabaseError(_) => ErrorSeverity::High,
            InitError::ConfigError { .. }
            | InitError::MissingConfigError { .. }
            | InitError::InvalidConfigValueError { .. }
            | InitError::MalformedSecretError { .. } => ErrorSeverity::High,
            InitError::IoError(_) | InitError::SqlFileError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            InitError::MissingConfigError { field } => {
                format!("Set the {} value before running the initializer", field)
            }
            InitError::InvalidConfigValueError { field, .. } => {
                format!("Check the value configured for {}", field)
            }
            InitError::ConfigError { .. } => "Review the initializer configuration".to_string(),
            InitError::SecretRetrievalError { .. } => {
                "Verify the secret id and that the caller may read it".to_string()
            }
            InitError::MalformedSecretError { .. } => {
                "The secret must be a JSON object with username and password".to_string()
            }
            InitError::StatementError { file, index, .. } => {
                format!("Fix statement {} in {} and run again", index, file)
            }
            InitError::DatabaseError(_) => {
                "Check the database endpoint, name and network access".to_string()
            }
            InitError::SqlFileError { path, .. } => {
                format!("Make sure {} is bundled and readable", path)
            }
            InitError::IoError(_) => "Check that the configured files exist and are readable".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Secret => format!("Could not load database credentials: {}", self),
            ErrorCategory::Database => format!("Database initialization failed: {}", self),
            ErrorCategory::Io => format!("Could not read SQL files: {}", self),
        }
    }
}
