use std::path::PathBuf;

use crate::fsutil;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    FileOpen(#[from] fsutil::FileOpenError),
    #[error("failed to parse group catalog `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("group catalog declares no groups")]
    Empty,
    #[error("group `{0}` is declared more than once")]
    DuplicateGroup(String),
    #[error("invalid group name: {0:?}")]
    InvalidGroupName(String),
}

pub type Result<T> = std::result::Result<T, Error>;
