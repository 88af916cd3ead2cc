use tigger_auth::Identity;
use tigger_authz::{OrgRole, Subject};

use crate::extractor::TenantRejection;

/// Org-scoped caller identity. Every query is filtered by `org_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    pub org_id: String,
    pub user_id: String,
    pub role: Option<OrgRole>,
}

impl TenantContext {
    pub fn from_identity(identity: &Identity) -> Result<Self, TenantRejection> {
        let org_id = identity
            .org_id
            .clone()
            .filter(|org| !org.is_empty())
            .ok_or(TenantRejection::NoOrganization)?;

        Ok(Self {
            org_id,
            user_id: identity.user_id.clone(),
            role: identity.org_role.clone(),
        })
    }

    pub fn subject(&self) -> Subject {
        Subject::new(self.user_id.clone(), Some(self.org_id.clone()), self.role.clone())
    }

    pub fn is_admin(&self) -> bool {
        self.role.as_ref().map(OrgRole::is_admin).unwrap_or(false)
    }
}
