use std::path::PathBuf;

use shiori_api::AniListError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShioriError {
    #[error("config error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(#[from] AniListError),

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("failed to {action} {}: {source}", path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ShioriError {
    /// Build a `map_err` adapter that tags an IO error with what was being done and where.
    pub(crate) fn fs(
        action: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Filesystem {
            action,
            path,
            source,
        }
    }
}
