use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuthzError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    #[error("No organization selected")]
    NoOrganization,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    InvalidRequest(String),
}

impl AuthzError {
    pub fn forbidden(message: &str) -> Self {
        Self::Forbidden(message.to_string())
    }
}
