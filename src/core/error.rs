use std::fmt;

/// Error types for gridprobe operations
#[derive(Debug)]
pub enum GridProbeError {
    /// IO error (file operations, etc.)
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// HTTP client error
    Http(reqwest::Error),

    /// Export API answered with a non-success status
    Api { dataset: String, status: u16 },

    /// JSON decoding error
    Json(serde_json::Error),

    /// Payload was well-formed but not usable
    InvalidData(String),

    /// Extracted value could not be parsed as a number
    Parse { field: String, value: String },

    /// Regex compilation error
    Regex(regex::Error),

    /// TOML parsing error
    TomlParsing(toml::de::Error),

    /// Chart rendering error
    Plot(String),

    /// File not found error
    FileNotFound(String),

    /// Invalid argument error
    InvalidArgument(String),
}

impl fmt::Display for GridProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridProbeError::Io(err) => write!(f, "IO error: {err}"),
            GridProbeError::Config(msg) => write!(f, "Configuration error: {msg}"),
            GridProbeError::Http(err) => write!(f, "HTTP error: {err}"),
            GridProbeError::Api { dataset, status } => {
                write!(f, "API error: dataset '{dataset}' returned status {status}")
            }
            GridProbeError::Json(err) => write!(f, "JSON error: {err}"),
            GridProbeError::InvalidData(msg) => write!(f, "Invalid data: {msg}"),
            GridProbeError::Parse { field, value } => {
                write!(f, "Parse error: {field} value '{value}' is not a number")
            }
            GridProbeError::Regex(err) => write!(f, "Regex error: {err}"),
            GridProbeError::TomlParsing(err) => write!(f, "TOML parsing error: {err}"),
            GridProbeError::Plot(msg) => write!(f, "Plot error: {msg}"),
            GridProbeError::FileNotFound(path) => write!(f, "File not found: {path}"),
            GridProbeError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
        }
    }
}

impl std::error::Error for GridProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GridProbeError::Io(err) => Some(err),
            GridProbeError::Http(err) => Some(err),
            GridProbeError::Json(err) => Some(err),
            GridProbeError::Regex(err) => Some(err),
            GridProbeError::TomlParsing(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GridProbeError {
    fn from(err: std::io::Error) -> Self {
        GridProbeError::Io(err)
    }
}

impl From<reqwest::Error> for GridProbeError {
    fn from(err: reqwest::Error) -> Self {
        GridProbeError::Http(err)
    }
}

impl From<serde_json::Error> for GridProbeError {
    fn from(err: serde_json::Error) -> Self {
        GridProbeError::Json(err)
    }
}

impl From<regex::Error> for GridProbeError {
    fn from(err: regex::Error) -> Self {
        GridProbeError::Regex(err)
    }
}

impl From<toml::de::Error> for GridProbeError {
    fn from(err: toml::de::Error) -> Self {
        GridProbeError::TomlParsing(err)
    }
}

impl GridProbeError {
    /// Build a `Parse` error for a field whose text is not a float
    pub fn parse(field: &str, value: &str) -> Self {
        GridProbeError::Parse {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// Type alias for Results using GridProbeError
pub type Result<T> = std::result::Result<T, GridProbeError>;
