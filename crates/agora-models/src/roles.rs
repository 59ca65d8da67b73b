//! System roles and the dashboard each one lands on after login.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Landing path for roles without a dedicated dashboard.
pub const DEFAULT_DASHBOARD: &str = "/dashboard";

/// Role carried on the authenticated user.
///
/// The four system roles are matched exactly as the API spells them
/// (`SUPER_ADMIN`, ...). Anything else is kept verbatim in [`Role::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    SuperAdmin,
    SchoolAdmin,
    Teacher,
    Student,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::SchoolAdmin => "SCHOOL_ADMIN",
            Self::Teacher => "TEACHER",
            Self::Student => "STUDENT",
            Self::Other(role) => role,
        }
    }

    /// Where the user is sent once the session is established.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "/dashboard/super-admin",
            Self::SchoolAdmin => "/dashboard/school",
            Self::Teacher => "/dashboard/teacher",
            Self::Student => "/dashboard/student",
            Self::Other(_) => DEFAULT_DASHBOARD,
        }
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        match role.as_str() {
            "SUPER_ADMIN" => Self::SuperAdmin,
            "SCHOOL_ADMIN" => Self::SchoolAdmin,
            "TEACHER" => Self::Teacher,
            "STUDENT" => Self::Student,
            _ => Self::Other(role),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(role) => role,
            known => known.as_str().to_owned(),
        }
    }
}

/// A user the API sent without a role.
impl Default for Role {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// School roles with permanent full access; they cannot be edited.
pub const PRINCIPAL_ROLES: [&str; 6] = [
    "principal",
    "school_principal",
    "head_teacher",
    "headmaster",
    "headmistress",
    "school_owner",
];

/// Whether a school role name denotes a principal.
///
/// Case-insensitive. Matches exactly, or when a principal role name is
/// contained in the given one (`"Acting Headmaster"` matches `headmaster`).
pub fn is_principal_role(role: Option<&str>) -> bool {
    let Some(role) = role else {
        return false;
    };
    let normalized = role.trim().to_lowercase();
    if normalized.is_empty() {
        return false;
    }

    PRINCIPAL_ROLES
        .iter()
        .any(|principal| normalized == *principal || normalized.contains(principal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_paths() {
        assert_eq!(Role::SuperAdmin.dashboard_path(), "/dashboard/super-admin");
        assert_eq!(Role::SchoolAdmin.dashboard_path(), "/dashboard/school");
        assert_eq!(Role::Teacher.dashboard_path(), "/dashboard/teacher");
        assert_eq!(Role::Student.dashboard_path(), "/dashboard/student");
        assert_eq!(Role::from("BURSAR".to_string()).dashboard_path(), "/dashboard");
    }

    #[test]
    fn test_role_serde_roundtrip_keeps_unknown() {
        let role: Role = serde_json::from_str("\"PARENT\"").unwrap();
        assert_eq!(role, Role::Other("PARENT".to_string()));
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"PARENT\"");

        let role: Role = serde_json::from_str("\"SCHOOL_ADMIN\"").unwrap();
        assert_eq!(role, Role::SchoolAdmin);
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"SCHOOL_ADMIN\"");
    }

    #[test]
    fn test_role_match_is_exact() {
        assert_eq!(
            Role::from("super_admin".to_string()),
            Role::Other("super_admin".to_string())
        );
    }

    #[test]
    fn test_principal_roles() {
        assert!(is_principal_role(Some("Principal")));
        assert!(is_principal_role(Some("school_owner")));
        assert!(is_principal_role(Some("  HEADMISTRESS ")));
        assert!(is_principal_role(Some("acting headmaster")));
    }

    #[test]
    fn test_non_principal_roles() {
        assert!(!is_principal_role(Some("Bursar")));
        assert!(!is_principal_role(Some("")));
        assert!(!is_principal_role(None));
    }
}
