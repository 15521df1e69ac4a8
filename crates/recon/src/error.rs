use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (threshold out of range, inverted tiers, etc.).
    ConfigValidation(String),
    /// Missing required column in an input record set.
    MissingColumn { input: String, column: String },
    /// Malformed CSV input.
    Csv { input: String, message: String },
    /// IO error (file read, etc.).
    Io(String),
    /// History store failure. The run was not saved.
    Store(String),
    /// Report or summary serialization failed.
    Serialize(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { input, column } => {
                write!(f, "{input}: missing column '{column}'")
            }
            Self::Csv { input, message } => write!(f, "{input}: malformed CSV: {message}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Store(msg) => write!(f, "history store error: {msg}"),
            Self::Serialize(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

impl From<serde_json::Error> for ReconError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}
