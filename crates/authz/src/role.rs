use serde::{Deserialize, Serialize};
use std::fmt;

/// Organization role as issued by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrgRole {
    Admin,
    Moderator,
    Member,
    Other(String),
}

impl OrgRole {
    /// Accepts both the prefixed (`org:admin`) and bare (`admin`) forms.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let name = trimmed.strip_prefix("org:").unwrap_or(trimmed);
        match name.to_ascii_lowercase().as_str() {
            "admin" => OrgRole::Admin,
            "moderator" => OrgRole::Moderator,
            "member" | "basic_member" => OrgRole::Member,
            _ => OrgRole::Other(trimmed.to_string()),
        }
    }

    /// Admins and moderators have the same privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, OrgRole::Admin | OrgRole::Moderator)
    }
}

impl From<String> for OrgRole {
    fn from(raw: String) -> Self {
        OrgRole::parse(&raw)
    }
}

impl From<OrgRole> for String {
    fn from(role: OrgRole) -> Self {
        role.to_string()
    }
}

impl fmt::Display for OrgRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrgRole::Admin => f.write_str("org:admin"),
            OrgRole::Moderator => f.write_str("org:moderator"),
            OrgRole::Member => f.write_str("org:member"),
            OrgRole::Other(raw) => f.write_str(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(OrgRole::parse("org:admin"), OrgRole::Admin);
        assert_eq!(OrgRole::parse("admin"), OrgRole::Admin);
        assert_eq!(OrgRole::parse("org:moderator"), OrgRole::Moderator);
        assert_eq!(OrgRole::parse("org:member"), OrgRole::Member);
        assert_eq!(OrgRole::parse("org:billing"), OrgRole::Other("org:billing".into()));
    }

    #[test]
    fn test_is_admin() {
        assert!(OrgRole::Admin.is_admin());
        assert!(OrgRole::Moderator.is_admin());
        assert!(!OrgRole::Member.is_admin());
        assert!(!OrgRole::Other("org:admins".into()).is_admin());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for role in [OrgRole::Admin, OrgRole::Moderator, OrgRole::Member] {
            assert_eq!(OrgRole::parse(&role.to_string()), role);
        }
    }
}
