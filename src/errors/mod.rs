use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to decode config fragment '{path}': {message}")]
    ConfigParse { path: String, message: String },

    #[error("Invalid directory layout: {0}")]
    Layout(String),

    #[error("Unsorted input: {0}")]
    UnsortedInput(String),

    #[error("No channel groups configured")]
    NoChannelGroups,

    // Publication date errors
    #[error("Date '{0}' has wrong format")]
    DateFormat(String),

    #[error("Unknown time zone abbreviation: {0}")]
    UnknownTimezone(String),

    // Feed errors
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),

    #[error("Feed parsing failed: {0}")]
    FeedParse(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Persisted record errors
    #[error("Unable to read '{path}': {message}")]
    RecordRead { path: String, message: String },

    #[error("Unable to decode '{path}': {message}")]
    RecordDecode { path: String, message: String },

    #[error("Unable to write '{path}': {message}")]
    RecordWrite { path: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;
