#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("session closed")]
    SessionClosed,
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
