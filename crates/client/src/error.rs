use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Error envelope answered by the server
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Response had no data")]
    MissingData,
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            ClientError::Server { status, .. } => Some(*status),
            ClientError::MissingData => None,
        }
    }
}
