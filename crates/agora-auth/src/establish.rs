//! Final step of the login: store the session and pick the landing page.

use agora_models::AuthenticatedSession;
use std::sync::Arc;
use tracing::{info, warn};

use crate::store::{CURRENT_SCHOOL_ID_KEY, KeyValueStore, SessionStore};

/// Which step of the handshake produced a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginPath {
    /// Verified one-time code.
    Otp,
    /// Tokens returned directly by `/auth/login`.
    LegacyBypass,
}

impl LoginPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Otp => "otp",
            Self::LegacyBypass => "legacy_bypass",
        }
    }
}

/// A session the client is allowed to establish.
///
/// Only code in this crate can mint one, so a session reaches the store only
/// through verification or the legacy login path.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    session: AuthenticatedSession,
    path: LoginPath,
}

impl SessionGrant {
    pub(crate) fn from_otp(session: AuthenticatedSession) -> Self {
        Self {
            session,
            path: LoginPath::Otp,
        }
    }

    pub(crate) fn from_legacy(session: AuthenticatedSession) -> Self {
        Self {
            session,
            path: LoginPath::LegacyBypass,
        }
    }

    pub fn path(&self) -> LoginPath {
        self.path
    }

    pub fn session(&self) -> &AuthenticatedSession {
        &self.session
    }
}

/// Result of establishing a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Established {
    pub redirect: &'static str,
    pub path: LoginPath,
}

#[derive(Clone)]
pub struct SessionEstablisher {
    sessions: Arc<dyn SessionStore>,
    state: Arc<dyn KeyValueStore>,
}

impl SessionEstablisher {
    pub fn new(sessions: Arc<dyn SessionStore>, state: Arc<dyn KeyValueStore>) -> Self {
        Self { sessions, state }
    }

    /// Stores the session, remembers the user's school, and returns the
    /// dashboard for the user's role.
    ///
    /// Establishing the same grant twice leaves the same state behind.
    /// Failing to persist `currentSchoolId` is logged and does not undo the
    /// login.
    pub fn establish(&self, grant: SessionGrant) -> Established {
        let SessionGrant { session, path } = grant;
        let redirect = session.user.role.dashboard_path();
        let role = session.user.role.clone();
        let school_id = session.user.school_id.clone();

        self.sessions.set(session);

        if let Some(school_id) = school_id {
            if let Err(e) = self.state.set(CURRENT_SCHOOL_ID_KEY, school_id.as_str()) {
                warn!(error = %e, "Failed to persist current school");
            }
        }

        info!(role = %role, path = path.as_str(), redirect, "Session established");
        Established { redirect, path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemorySessionStore, MemoryKeyValueStore};

    fn session(json: &str) -> AuthenticatedSession {
        serde_json::from_str(json).unwrap()
    }

    fn establisher() -> (
        SessionEstablisher,
        Arc<InMemorySessionStore>,
        Arc<MemoryKeyValueStore>,
    ) {
        let sessions = Arc::new(InMemorySessionStore::new());
        let state = Arc::new(MemoryKeyValueStore::new());
        (
            SessionEstablisher::new(sessions.clone(), state.clone()),
            sessions,
            state,
        )
    }

    #[test]
    fn test_redirect_per_role() {
        let (establisher, _, _) = establisher();
        let cases = [
            ("SUPER_ADMIN", "/dashboard/super-admin"),
            ("SCHOOL_ADMIN", "/dashboard/school"),
            ("TEACHER", "/dashboard/teacher"),
            ("STUDENT", "/dashboard/student"),
            ("PARENT", "/dashboard"),
        ];
        for (role, expected) in cases {
            let grant = SessionGrant::from_otp(session(&format!(
                r#"{{"accessToken":"tok","user":{{"role":"{role}"}}}}"#
            )));
            assert_eq!(establisher.establish(grant).redirect, expected, "role {role}");
        }
    }

    #[test]
    fn test_persists_school_id() {
        let (establisher, sessions, state) = establisher();
        let grant = SessionGrant::from_otp(session(
            r#"{"accessToken":"tok","user":{"role":"SCHOOL_ADMIN","schoolId":"sch_1"}}"#,
        ));

        let established = establisher.establish(grant);
        assert_eq!(established.path, LoginPath::Otp);
        assert_eq!(sessions.get().unwrap().access_token, "tok");
        assert_eq!(
            state.get(CURRENT_SCHOOL_ID_KEY).unwrap().as_deref(),
            Some("sch_1")
        );
    }

    #[test]
    fn test_without_school_id_leaves_key_alone() {
        let (establisher, _, state) = establisher();
        state.set(CURRENT_SCHOOL_ID_KEY, "sch_old").unwrap();
        let grant = SessionGrant::from_legacy(session(
            r#"{"accessToken":"tok","user":{"role":"SUPER_ADMIN"}}"#,
        ));

        assert_eq!(establisher.establish(grant).path, LoginPath::LegacyBypass);
        assert_eq!(
            state.get(CURRENT_SCHOOL_ID_KEY).unwrap().as_deref(),
            Some("sch_old")
        );
    }

    #[test]
    fn test_establish_is_idempotent() {
        let (establisher, sessions, state) = establisher();
        let grant = SessionGrant::from_otp(session(
            r#"{"accessToken":"tok","refreshToken":"rtok","user":{"role":"TEACHER","schoolId":"sch_9"}}"#,
        ));

        let first = establisher.establish(grant.clone());
        let stored_once = sessions.get().unwrap();
        let second = establisher.establish(grant);

        assert_eq!(first, second);
        assert_eq!(sessions.get().unwrap(), stored_once);
        assert_eq!(
            state.get(CURRENT_SCHOOL_ID_KEY).unwrap().as_deref(),
            Some("sch_9")
        );
    }
}
