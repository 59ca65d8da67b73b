//! Scripted [`AuthApi`] for unit tests.

use agora_core::ClientError;
use agora_models::{LoginData, LoginRequest, VerifyLoginOtpRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;

use crate::api::AuthApi;

struct Scripted {
    result: Result<LoginData, ClientError>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Answers each call with the next queued response.
///
/// A gated response is held back until its sender fires (or is dropped),
/// which lets a test interleave other operations with a request in flight.
#[derive(Default)]
pub struct ScriptedAuthApi {
    logins: Mutex<VecDeque<Scripted>>,
    verifications: Mutex<VecDeque<Scripted>>,
    login_calls: AtomicUsize,
    verify_calls: AtomicUsize,
    last_login: Mutex<Option<LoginRequest>>,
    last_verify: Mutex<Option<VerifyLoginOtpRequest>>,
}

impl ScriptedAuthApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_login(&self, result: Result<LoginData, ClientError>) {
        self.logins
            .lock()
            .unwrap()
            .push_back(Scripted { result, gate: None });
    }

    pub fn push_login_gated(&self, result: Result<LoginData, ClientError>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.logins.lock().unwrap().push_back(Scripted {
            result,
            gate: Some(rx),
        });
        tx
    }

    pub fn push_verify(&self, result: Result<LoginData, ClientError>) {
        self.verifications
            .lock()
            .unwrap()
            .push_back(Scripted { result, gate: None });
    }

    pub fn push_verify_gated(&self, result: Result<LoginData, ClientError>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.verifications.lock().unwrap().push_back(Scripted {
            result,
            gate: Some(rx),
        });
        tx
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn last_login(&self) -> Option<LoginRequest> {
        self.last_login.lock().unwrap().clone()
    }

    pub fn last_verify(&self) -> Option<VerifyLoginOtpRequest> {
        self.last_verify.lock().unwrap().clone()
    }

    async fn answer(queue: &Mutex<VecDeque<Scripted>>) -> Result<LoginData, ClientError> {
        let next = queue.lock().unwrap().pop_front();
        let Some(Scripted { result, gate }) = next else {
            return Err(ClientError::protocol("no scripted response"));
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }
}

#[async_trait]
impl AuthApi for ScriptedAuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginData, ClientError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_login.lock().unwrap() = Some(request.clone());
        Self::answer(&self.logins).await
    }

    async fn verify_login_otp(
        &self,
        request: &VerifyLoginOtpRequest,
    ) -> Result<LoginData, ClientError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_verify.lock().unwrap() = Some(request.clone());
        Self::answer(&self.verifications).await
    }
}

/// Parses a `data` payload.
pub fn data(json: &str) -> LoginData {
    serde_json::from_str(json).unwrap()
}
