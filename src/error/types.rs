//! Error types
//!
//! Defines domain-specific error types for each module of the coral
//! bleaching API server and its offline trainer.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Authentication and token verification errors
///
/// Every variant maps to the same 401 on the wire; the distinction only
/// exists for internal logging and tests.
#[derive(Debug)]
pub enum AuthError {
    /// Token signature does not match the server secret
    InvalidSignature,
    /// Token expiry timestamp is in the past
    Expired,
    /// Token could not be decoded at all
    Malformed,
    /// Token subject does not resolve to a known user
    UnknownUser(String),
    /// Token subject resolves to a disabled user
    Disabled(String),
    /// Unknown username or wrong password at login
    InvalidCredentials,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidSignature => write!(f, "Invalid token signature"),
            AuthError::Expired => write!(f, "Token expired"),
            AuthError::Malformed => write!(f, "Malformed token"),
            AuthError::UnknownUser(u) => write!(f, "Token subject is not a known user: {}", u),
            AuthError::Disabled(u) => write!(f, "User is disabled: {}", u),
            AuthError::InvalidCredentials => write!(f, "Invalid username or password"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Model artifact errors
#[derive(Debug)]
pub enum ModelError {
    /// None of the candidate artifact paths exist
    Unavailable(Vec<String>),
    /// An artifact file exists but does not describe a usable model
    Artifact(PathBuf, String),
    /// Reading or writing an artifact file failed
    Io(PathBuf, io::Error),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Unavailable(paths) => {
                write!(f, "No model artifact found. Tried: {:?}", paths)
            }
            ModelError::Artifact(path, detail) => {
                write!(f, "Invalid model artifact {}: {}", path.display(), detail)
            }
            ModelError::Io(path, e) => write!(f, "Model artifact I/O {}: {}", path.display(), e),
        }
    }
}

impl std::error::Error for ModelError {}

/// Dataset loading and preparation errors (offline trainer)
#[derive(Debug)]
pub enum DatasetError {
    /// Reading the CSV file failed
    Io(PathBuf, io::Error),
    /// A required column is missing from the CSV header
    MissingColumn(String),
    /// A record could not be parsed
    Parse { record: usize, detail: String },
    /// A feature column has no observed values to impute from
    AllMissing(String),
    /// No rows survived target derivation
    Empty,
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Io(path, e) => write!(f, "Dataset I/O {}: {}", path.display(), e),
            DatasetError::MissingColumn(c) => write!(f, "Missing CSV column: {}", c),
            DatasetError::Parse { record, detail } => {
                write!(f, "CSV record {}: {}", record, detail)
            }
            DatasetError::AllMissing(c) => {
                write!(f, "Column {} has no values to impute a median from", c)
            }
            DatasetError::Empty => write!(f, "No labelled rows in dataset"),
        }
    }
}

impl std::error::Error for DatasetError {}

/// HTTP-facing request errors
///
/// Deliberately coarse: whatever went wrong inside the auth path, the
/// client sees the same unauthorized response.
#[derive(Debug)]
pub enum ApiError {
    /// Missing, invalid, or expired credentials
    Unauthorized,
    /// Unexpected server-side failure
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "Unauthorized"),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(_: AuthError) -> Self {
        ApiError::Unauthorized
    }
}

/// General server error that encompasses the offline pipeline error types
#[derive(Debug)]
pub enum CoralServerError {
    Dataset(DatasetError),
    Model(ModelError),
}

impl fmt::Display for CoralServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoralServerError::Dataset(e) => write!(f, "Dataset error: {}", e),
            CoralServerError::Model(e) => write!(f, "Model error: {}", e),
        }
    }
}

impl std::error::Error for CoralServerError {}

impl From<DatasetError> for CoralServerError {
    fn from(error: DatasetError) -> Self {
        CoralServerError::Dataset(error)
    }
}

impl From<ModelError> for CoralServerError {
    fn from(error: ModelError) -> Self {
        CoralServerError::Model(error)
    }
}
