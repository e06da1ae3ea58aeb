use thiserror::Error;

/// Unified error type for version-bump operations
#[derive(Error, Debug)]
pub enum BumpError {
    #[error("Version field not found in file")]
    VersionFieldNotFound,

    #[error("Version code not found in file")]
    VersionCodeNotFound,

    #[error("Invalid increment type: {0}")]
    InvalidIncrementKind(String),

    #[error("Invalid mode: {0}. Must be either 'update-file' or 'comment-only'")]
    InvalidMode(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Not in a pull request context and no branch given - cannot detect branch")]
    BranchNotDetected,

    #[error("Git operation failed: {0}")]
    VcsOperationFailed(String),

    #[error("Failed to add PR comment: {0}")]
    NotificationFailed(String),

    #[error("Malformed version: {0}")]
    MalformedVersion(String),

    #[error("Malformed version code: {0}")]
    MalformedVersionCode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Action context error: {0}")]
    Context(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in version-bump
pub type Result<T> = std::result::Result<T, BumpError>;

impl BumpError {
    /// Create a VCS error with context
    pub fn vcs(msg: impl Into<String>) -> Self {
        BumpError::VcsOperationFailed(msg.into())
    }

    /// Create a notification error with context
    pub fn notification(msg: impl Into<String>) -> Self {
        BumpError::NotificationFailed(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BumpError::Config(msg.into())
    }

    /// Create an action context error
    pub fn context(msg: impl Into<String>) -> Self {
        BumpError::Context(msg.into())
    }

    /// Whether the run may continue past this error.
    ///
    /// Only a failed PR comment is tolerated: a missing reminder should not
    /// fail a release.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BumpError::NotificationFailed(_))
    }
}

impl From<git2::Error> for BumpError {
    fn from(err: git2::Error) -> Self {
        BumpError::VcsOperationFailed(err.message().to_string())
    }
}
