use crate::{catalog, output};

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load group catalog: {0}")]
    Catalog(#[from] catalog::Error),
    #[error("failed to write inventory: {0}")]
    Output(#[from] output::Error),
    #[error("failed to encode inventory: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write to stdout: {0}")]
    Stdout(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub trait ResultOkLogExt<T, E> {
    fn ok_log(self) -> Option<T>;
}

impl<T, E> ResultOkLogExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    fn ok_log(self) -> Option<T> {
        match self {
            Ok(ok) => Some(ok),
            Err(err) => {
                log::error!("{err}");
                None
            }
        }
    }
}
