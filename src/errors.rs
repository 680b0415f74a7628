use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error from a fallible constructor (`open`, `create`, ...).
///
/// The stream traits themselves are infallible; errors can only happen
/// while hooking a backend up.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(#[from] ErrorInner);

#[derive(Debug, Error)]
pub(crate) enum ErrorInner {
    #[error("unable to open {}: {}", .path.display(), .source)]
    UnableToOpen { path: PathBuf, source: io::Error },
    #[error("unable to create {}: {}", .path.display(), .source)]
    UnableToCreate { path: PathBuf, source: io::Error },
    #[error("unable to determine input length: {source}")]
    Length { source: io::Error },
    #[error("IO error: {source}")]
    Io { source: io::Error },
}

impl From<io::Error> for ErrorInner {
    fn from(e: io::Error) -> Self {
        ErrorInner::Io { source: e }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error(e.into())
    }
}
