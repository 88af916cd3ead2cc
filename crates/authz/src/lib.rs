pub mod error;
pub mod policy;
pub mod role;

pub use error::{AuthzError, Result};
pub use policy::{authorize, Action, Resource, Subject};
pub use role::OrgRole;
