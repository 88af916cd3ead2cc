pub mod error;
pub mod session;

pub use error::{AuthError, Result};
pub use session::{
    Identity, SessionClaims, SessionConfig, SessionKey, SessionVerifier, DEFAULT_COOKIE_NAME,
};
