pub mod context;
pub mod extractor;

pub use context::TenantContext;
pub use extractor::TenantRejection;
