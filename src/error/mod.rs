use crate::input::CommandError;
use crate::loader::LoadError;
use crate::session::SessionError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("failed to encode GeoJSON: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to read or write shell streams: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing image argument; usage: pixmark <image-path-or-uri>")]
    MissingImageArgument,
}
