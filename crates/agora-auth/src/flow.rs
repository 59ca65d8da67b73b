//! The login state machine.
//!
//! [`LoginFlow`] sequences credential entry, the OTP challenge, and session
//! establishment. It never returns an error: every failure is turned into a
//! user-facing message kept in the flow and reported as [`FlowEvent::Failed`].
//!
//! State lives behind a `std::sync::Mutex` that is never held across an
//! `.await`. Requests run unlocked; when a verify or resend response comes
//! back, the challenge generation it was sent for is compared with the
//! current one and a response for a challenge the user has moved on from is
//! dropped.

use agora_config::LoginConfig;
use agora_core::ClientError;
use agora_models::{AuthenticatedSession, LoginRequest, OtpCode, OtpSessionId};
use agora_observability::tracing_utils::{record_auth_result, record_user_role};
use agora_observability::{
    security_event, track_legacy_login, track_login_failure, track_login_success, track_otp_resend,
};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{Span, debug, info, instrument, warn};

use crate::api::AuthApi;
use crate::claims::is_expired;
use crate::code::{CodeCollector, CodeEvent};
use crate::credentials::{
    CredentialSubmitter, LOGIN_FAILED_MESSAGE, LoginOutcome, UNEXPECTED_RESPONSE_MESSAGE,
};
use crate::establish::{Established, LoginPath, SessionEstablisher, SessionGrant};
use crate::otp::{Cooldown, OtpChallenge, OtpSessionHolder};
use crate::store::{CURRENT_SCHOOL_ID_KEY, KeyValueStore, SessionStore};

pub const OTP_VERIFICATION_FAILED_MESSAGE: &str = "OTP verification failed";
pub const RESEND_FAILED_MESSAGE: &str = "Failed to resend OTP";
pub const SESSION_EXPIRED_MESSAGE: &str =
    "Your session has expired. Please log in again to continue.";

/// Which screen the user is on.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthUiState {
    CredentialEntry,
    AwaitingOtp(OtpChallenge),
    Authenticated(Arc<AuthenticatedSession>),
}

/// Outcome of a single flow operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// Not applicable in the current state, or already in progress.
    Ignored,
    /// Input accepted; nothing was sent.
    Pending,
    /// The operation failed; the message is also kept as the flow's error.
    Failed(String),
    /// A code was sent to `email`.
    OtpRequired { email: String },
    /// A new code was sent; the slots were cleared.
    Resent,
    Authenticated {
        redirect: &'static str,
        path: LoginPath,
    },
    /// The response belonged to a challenge that is no longer current.
    Discarded,
    LoggedOut,
    /// The stored session had expired and was cleared.
    Expired,
}

/// Point-in-time copy of everything a front end renders.
#[derive(Debug, Clone)]
pub struct FlowSnapshot {
    pub ui: AuthUiState,
    /// Last identifier submitted, kept as a hint after going back.
    pub identifier: String,
    pub slots: [Option<char>; agora_models::OTP_LENGTH],
    /// The slots as text, `-` for empty ones.
    pub display: String,
    pub focus: usize,
    pub cooldown: u32,
    pub error: Option<String>,
    pub loading: bool,
    pub resending: bool,
}

impl FlowSnapshot {
    pub fn challenge(&self) -> Option<&OtpChallenge> {
        match &self.ui {
            AuthUiState::AwaitingOtp(challenge) => Some(challenge),
            _ => None,
        }
    }

    pub fn can_resend(&self) -> bool {
        self.challenge().is_some() && self.cooldown == 0 && !self.resending
    }
}

struct FlowState {
    ui: AuthUiState,
    identifier: String,
    /// Present only while awaiting a code; needed to resend.
    secret: Option<SecretString>,
    code: CodeCollector,
    cooldown: Cooldown,
    error: Option<String>,
    loading: bool,
    /// Generation of the challenge a resend is in flight for.
    resending: Option<u64>,
    generation: u64,
}

impl FlowState {
    fn new(ui: AuthUiState) -> Self {
        Self {
            ui,
            identifier: String::new(),
            secret: None,
            code: CodeCollector::new(),
            cooldown: Cooldown::started(),
            error: None,
            loading: false,
            resending: None,
            generation: 0,
        }
    }

    fn challenge(&self) -> Option<&OtpChallenge> {
        match &self.ui {
            AuthUiState::AwaitingOtp(challenge) => Some(challenge),
            _ => None,
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.challenge()
            .is_some_and(|challenge| challenge.generation == generation)
    }

    fn is_resending(&self) -> bool {
        self.challenge()
            .is_some_and(|challenge| self.resending == Some(challenge.generation))
    }

    /// Leaves the OTP step: a later response for the old challenge is stale.
    fn reset_to_credentials(&mut self) {
        self.generation += 1;
        self.ui = AuthUiState::CredentialEntry;
        self.secret = None;
        self.code.clear();
        self.cooldown.reset();
        self.error = None;
        self.resending = None;
    }

    fn fail(&mut self, message: String) -> FlowEvent {
        self.error = Some(message.clone());
        FlowEvent::Failed(message)
    }
}

#[derive(Clone, Copy)]
enum Busy {
    Loading,
    /// Resend for the challenge of this generation.
    Resending(u64),
}

/// Clears a busy flag when the operation that set it ends, however it ends.
struct BusyGuard<'a> {
    state: &'a Mutex<FlowState>,
    busy: Busy,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match self.busy {
            Busy::Loading => state.loading = false,
            Busy::Resending(generation) => {
                if state.resending == Some(generation) {
                    state.resending = None;
                }
            }
        }
    }
}

/// Drives one user through login, verification, and logout.
///
/// Shared as `Arc<LoginFlow>`; every method takes `&self`.
pub struct LoginFlow {
    submitter: CredentialSubmitter,
    otp: OtpSessionHolder,
    establisher: SessionEstablisher,
    sessions: Arc<dyn SessionStore>,
    durable: Arc<dyn KeyValueStore>,
    config: LoginConfig,
    state: Mutex<FlowState>,
}

impl LoginFlow {
    pub fn new(
        api: Arc<dyn AuthApi>,
        sessions: Arc<dyn SessionStore>,
        durable: Arc<dyn KeyValueStore>,
        config: LoginConfig,
    ) -> Self {
        let ui = match sessions.get() {
            Some(session) => AuthUiState::Authenticated(session),
            None => AuthUiState::CredentialEntry,
        };
        Self {
            submitter: CredentialSubmitter::new(api.clone()),
            otp: OtpSessionHolder::new(api),
            establisher: SessionEstablisher::new(sessions.clone(), durable.clone()),
            sessions,
            durable,
            config,
            state: Mutex::new(FlowState::new(ui)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FlowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn busy(&self, busy: Busy) -> BusyGuard<'_> {
        BusyGuard {
            state: &self.state,
            busy,
        }
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        let state = self.lock();
        FlowSnapshot {
            ui: state.ui.clone(),
            identifier: state.identifier.clone(),
            slots: *state.code.slots(),
            display: state.code.display(),
            focus: state.code.focus(),
            cooldown: state.cooldown.remaining(),
            error: state.error.clone(),
            loading: state.loading,
            resending: state.is_resending(),
        }
    }

    pub fn ui_state(&self) -> AuthUiState {
        self.lock().ui.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    // ------------------------------------------------------------------
    // Credentials
    // ------------------------------------------------------------------

    /// Submits identifier and password.
    ///
    /// Ignored while another request of this step is outstanding or while a
    /// code is awaited. Invalid input fails without any request.
    #[instrument(
        name = "auth",
        skip_all,
        fields(
            auth.event = "login",
            auth.success = tracing::field::Empty,
            user.role = tracing::field::Empty
        )
    )]
    pub async fn submit_credentials(&self, identifier: &str, password: SecretString) -> FlowEvent {
        {
            let mut state = self.lock();
            if state.loading || state.challenge().is_some() {
                return FlowEvent::Ignored;
            }
            state.loading = true;
            state.error = None;
            state.identifier = identifier.trim().to_string();
        }
        let _busy = self.busy(Busy::Loading);

        match self.submitter.submit(identifier, &password).await {
            Ok(LoginOutcome::OtpRequired { session_id, email }) => {
                self.enter_otp_step(session_id, email, password)
            }
            Ok(LoginOutcome::LegacyBypass(session)) => self.accept_legacy(session),
            Err(e) => {
                record_auth_result(false);
                report_failure(&mut self.lock(), e, LOGIN_FAILED_MESSAGE, "login")
            }
        }
    }

    fn enter_otp_step(
        &self,
        session_id: OtpSessionId,
        email: String,
        password: SecretString,
    ) -> FlowEvent {
        let mut state = self.lock();
        state.generation += 1;
        info!(
            session_id = %session_id,
            generation = state.generation,
            "Login code required"
        );
        state.ui = AuthUiState::AwaitingOtp(OtpChallenge {
            session_id,
            email: email.clone(),
            generation: state.generation,
        });
        state.secret = Some(password);
        state.code.clear();
        state.cooldown.reset();
        state.error = None;
        state.resending = None;
        FlowEvent::OtpRequired { email }
    }

    fn accept_legacy(&self, session: AuthenticatedSession) -> FlowEvent {
        let role = session.user.role.clone();
        security_event!(
            "login_without_otp",
            user.role = %role,
            allowed = self.config.allow_legacy_login,
            "Login returned tokens without a second factor"
        );
        track_legacy_login();

        if !self.config.allow_legacy_login {
            record_auth_result(false);
            track_login_failure("legacy_rejected");
            return self.lock().fail(UNEXPECTED_RESPONSE_MESSAGE.to_string());
        }

        let mut state = self.lock();
        let event = self.complete_login(&mut state, SessionGrant::from_legacy(session));
        state.secret = None;
        event
    }

    /// Establishes a grant and moves to the authenticated state.
    fn complete_login(&self, state: &mut FlowState, grant: SessionGrant) -> FlowEvent {
        let role = grant.session().user.role.clone();
        let Established { redirect, path } = self.establisher.establish(grant);

        state.generation += 1;
        state.ui = match self.sessions.get() {
            Some(session) => AuthUiState::Authenticated(session),
            None => AuthUiState::CredentialEntry,
        };
        state.secret = None;
        state.code.clear();
        state.error = None;

        record_auth_result(true);
        record_user_role(role.as_str());
        track_login_success(role.as_str());
        FlowEvent::Authenticated { redirect, path }
    }

    // ------------------------------------------------------------------
    // Code entry
    // ------------------------------------------------------------------

    /// Applies a code edit. Inputs are disabled while a verification runs.
    fn edit_code<F>(&self, edit: F) -> Option<CodeEvent>
    where
        F: FnOnce(&mut CodeCollector) -> CodeEvent,
    {
        let mut state = self.lock();
        if state.loading || state.challenge().is_none() {
            return None;
        }
        Some(edit(&mut state.code))
    }

    async fn after_edit(&self, event: Option<CodeEvent>) -> FlowEvent {
        match event {
            Some(CodeEvent::Complete(code)) => self.verify(code).await,
            Some(CodeEvent::Updated) => FlowEvent::Pending,
            Some(CodeEvent::Rejected) | None => FlowEvent::Ignored,
        }
    }

    /// Types a digit into the focused slot; completing the code verifies it.
    pub async fn enter_digit(&self, ch: char) -> FlowEvent {
        let event = self.edit_code(|code| code.type_digit(ch));
        self.after_edit(event).await
    }

    /// Types a digit into slot `index`.
    pub async fn input_at(&self, index: usize, ch: char) -> FlowEvent {
        let event = self.edit_code(|code| code.input(index, ch));
        self.after_edit(event).await
    }

    /// Pastes text into the code; six digits verify immediately.
    pub async fn paste(&self, text: &str) -> FlowEvent {
        let event = self.edit_code(|code| code.paste(text));
        self.after_edit(event).await
    }

    /// Backspace in the focused slot.
    pub fn backspace(&self) -> FlowEvent {
        let event = self.edit_code(|code| {
            let focus = code.focus();
            code.backspace(focus)
        });
        match event {
            Some(CodeEvent::Updated) => FlowEvent::Pending,
            _ => FlowEvent::Ignored,
        }
    }

    /// The "Verify" button: verifies the entered code if it is complete.
    pub async fn submit_code(&self) -> FlowEvent {
        let code = self.lock().code.submit();
        match code {
            Some(code) => self.verify(code).await,
            None => FlowEvent::Ignored,
        }
    }

    // ------------------------------------------------------------------
    // Verification and resend
    // ------------------------------------------------------------------

    /// Verifies `code` against the current challenge.
    #[instrument(
        name = "auth",
        skip_all,
        fields(
            auth.event = "verify_otp",
            auth.success = tracing::field::Empty,
            user.role = tracing::field::Empty,
            otp.generation = tracing::field::Empty
        )
    )]
    pub async fn verify(&self, code: OtpCode) -> FlowEvent {
        let (session_id, generation) = {
            let mut state = self.lock();
            if state.loading {
                return FlowEvent::Ignored;
            }
            let Some(challenge) = state.challenge() else {
                return FlowEvent::Ignored;
            };
            let pending = (challenge.session_id.clone(), challenge.generation);
            state.loading = true;
            state.error = None;
            pending
        };
        let _busy = self.busy(Busy::Loading);
        Span::current().record("otp.generation", generation);

        let result = self.otp.verify(&session_id, code).await;

        let mut state = self.lock();
        if !state.is_current(generation) {
            info!(generation, "Dropping verification for a superseded challenge");
            return FlowEvent::Discarded;
        }

        match result {
            Ok(grant) => self.complete_login(&mut state, grant),
            Err(e) => {
                record_auth_result(false);
                report_failure(&mut state, e, OTP_VERIFICATION_FAILED_MESSAGE, "verify_otp")
            }
        }
    }

    /// Asks for a new code by re-submitting the retained login.
    ///
    /// Ignored while the cooldown runs or another resend for the same
    /// challenge is in flight. On success the cooldown restarts and the slots
    /// are cleared; on failure both are left as they were.
    #[instrument(
        name = "auth",
        skip_all,
        fields(
            auth.event = "resend_otp",
            auth.success = tracing::field::Empty,
            user.role = tracing::field::Empty,
            otp.generation = tracing::field::Empty
        )
    )]
    pub async fn resend(&self) -> FlowEvent {
        let (request, generation) = {
            let mut state = self.lock();
            if state.is_resending() || !state.cooldown.is_ready() {
                return FlowEvent::Ignored;
            }
            let Some(generation) = state.challenge().map(|c| c.generation) else {
                return FlowEvent::Ignored;
            };
            let Some(secret) = &state.secret else {
                return FlowEvent::Ignored;
            };
            let request = LoginRequest {
                email_or_public_id: state.identifier.clone(),
                password: secret.expose_secret().to_string(),
            };
            state.resending = Some(generation);
            state.error = None;
            (request, generation)
        };
        let _busy = self.busy(Busy::Resending(generation));
        Span::current().record("otp.generation", generation);

        let result = self.otp.resend(&request).await;

        let mut state = self.lock();
        if !state.is_current(generation) {
            info!(generation, "Dropping resend for a superseded challenge");
            return FlowEvent::Discarded;
        }

        match result {
            Ok(challenge) => {
                state.generation += 1;
                state.ui = AuthUiState::AwaitingOtp(OtpChallenge {
                    session_id: challenge.session_id,
                    email: challenge.email,
                    generation: state.generation,
                });
                state.cooldown.reset();
                state.code.clear();
                state.error = None;
                track_otp_resend();
                FlowEvent::Resent
            }
            Err(e) => report_failure(&mut state, e, RESEND_FAILED_MESSAGE, "resend_otp"),
        }
    }

    /// One second of resend cooldown elapsed. Returns the seconds left.
    pub fn tick(&self) -> u32 {
        let mut state = self.lock();
        if state.challenge().is_some() {
            state.cooldown.tick()
        } else {
            state.cooldown.remaining()
        }
    }

    // ------------------------------------------------------------------
    // Leaving the flow
    // ------------------------------------------------------------------

    /// Abandons the OTP step and returns to credential entry.
    ///
    /// The identifier stays as a hint; the password and challenge are dropped.
    pub fn back_to_login(&self) -> FlowEvent {
        let mut state = self.lock();
        if state.challenge().is_none() {
            return FlowEvent::Ignored;
        }
        state.reset_to_credentials();
        debug!(generation = state.generation, "Back to credential entry");
        FlowEvent::Pending
    }

    /// Clears the session and the persisted school.
    pub fn logout(&self) -> FlowEvent {
        let mut state = self.lock();
        self.clear_session();
        state.reset_to_credentials();
        info!("Logged out");
        FlowEvent::LoggedOut
    }

    /// Clears a stored session whose access token has expired at `now`.
    pub fn check_expiry(&self, now: DateTime<Utc>) -> FlowEvent {
        let Some(session) = self.sessions.get() else {
            return FlowEvent::Ignored;
        };
        if !is_expired(&session.access_token, now) {
            return FlowEvent::Ignored;
        }

        let mut state = self.lock();
        self.clear_session();
        state.reset_to_credentials();
        state.error = Some(SESSION_EXPIRED_MESSAGE.to_string());
        info!(role = %session.user.role, "Session expired");
        FlowEvent::Expired
    }

    fn clear_session(&self) {
        self.sessions.clear();
        if let Err(e) = self.durable.remove(CURRENT_SCHOOL_ID_KEY) {
            warn!(error = %e, "Failed to clear current school");
        }
    }
}

/// Logs a failed request and keeps its message as the flow's error.
///
/// Callers that compare challenge generations do so under the same lock.
fn report_failure(
    state: &mut FlowState,
    error: ClientError,
    fallback: &str,
    operation: &str,
) -> FlowEvent {
    match &error {
        ClientError::Validation(_) => debug!(operation, "Input rejected before sending"),
        ClientError::Request { status, .. } => {
            info!(operation, status, "Request rejected by server")
        }
        ClientError::Protocol(_) => warn!(operation, error = %error, "Unexpected response"),
        ClientError::Transport(_) | ClientError::Storage(_) => {
            warn!(operation, error = %error, "Request failed")
        }
    }
    track_login_failure(operation);
    state.fail(error.user_message(fallback))
}
