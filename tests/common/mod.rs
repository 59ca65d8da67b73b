use agora::ClientState;
use agora::config::{ApiConfig, LoginConfig, StorageConfig};
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// A canned reply for one request.
#[derive(Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
    pub set_cookie: Option<String>,
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
            set_cookie: None,
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
            set_cookie: None,
        }
    }

    #[allow(dead_code)]
    pub fn with_cookie(mut self, cookie: &str) -> Self {
        self.set_cookie = Some(cookie.to_string());
        self
    }
}

#[derive(Default)]
struct Endpoint {
    replies: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
    bodies: Mutex<Vec<Value>>,
    cookies: Mutex<Vec<Option<String>>>,
}

impl Endpoint {
    fn handle(&self, headers: &HeaderMap, body: &[u8]) -> Response {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bodies
            .lock()
            .unwrap()
            .push(serde_json::from_slice(body).unwrap_or(Value::Null));
        self.cookies.lock().unwrap().push(
            headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        );

        let reply = self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Reply::json(500, json!({"success": false, "message": "No reply scripted"}))
        });

        let mut response = (
            reply.status,
            [(header::CONTENT_TYPE, "application/json")],
            reply.body,
        )
            .into_response();
        if let Some(cookie) = reply.set_cookie {
            response
                .headers_mut()
                .insert(header::SET_COOKIE, cookie.parse().unwrap());
        }
        response
    }
}

/// Stand-in for the Agora API on an ephemeral local port.
#[derive(Clone, Default)]
pub struct StubApi {
    login: Arc<Endpoint>,
    verify: Arc<Endpoint>,
}

#[allow(dead_code)]
impl StubApi {
    /// Starts the stub and returns it with its base URL.
    pub async fn start() -> (Self, String) {
        let stub = Self::default();
        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/verify-login-otp", post(verify_login_otp))
            .with_state(stub.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (stub, format!("http://{}", addr))
    }

    pub fn reply_login(&self, reply: Reply) {
        self.login.replies.lock().unwrap().push_back(reply);
    }

    pub fn reply_verify(&self, reply: Reply) {
        self.verify.replies.lock().unwrap().push_back(reply);
    }

    pub fn login_calls(&self) -> usize {
        self.login.calls.load(Ordering::SeqCst)
    }

    pub fn verify_calls(&self) -> usize {
        self.verify.calls.load(Ordering::SeqCst)
    }

    pub fn login_bodies(&self) -> Vec<Value> {
        self.login.bodies.lock().unwrap().clone()
    }

    pub fn verify_bodies(&self) -> Vec<Value> {
        self.verify.bodies.lock().unwrap().clone()
    }

    pub fn verify_cookies(&self) -> Vec<Option<String>> {
        self.verify.cookies.lock().unwrap().clone()
    }
}

async fn login(State(stub): State<StubApi>, headers: HeaderMap, body: Bytes) -> Response {
    stub.login.handle(&headers, &body)
}

async fn verify_login_otp(
    State(stub): State<StubApi>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    stub.verify.handle(&headers, &body)
}

/// Wraps `data` in the API's success envelope.
#[allow(dead_code)]
pub fn ok(data: Value) -> Value {
    json!({
        "success": true,
        "message": "OK",
        "data": data,
        "timestamp": "2025-01-01T00:00:00.000Z"
    })
}

#[allow(dead_code)]
pub fn otp_required(session_id: &str, email: &str) -> Reply {
    Reply::json(
        200,
        ok(json!({"requiresOtp": true, "sessionId": session_id, "email": email})),
    )
}

#[allow(dead_code)]
pub fn verified(access_token: &str, role: &str, school_id: Option<&str>) -> Reply {
    let mut user = json!({"id": "usr_1", "role": role, "firstName": "Ada"});
    if let Some(school_id) = school_id {
        user["schoolId"] = json!(school_id);
    }
    Reply::json(
        200,
        ok(json!({"accessToken": access_token, "refreshToken": "rtok", "user": user})),
    )
}

/// Client state pointed at `base_url`, persisting into `dir`.
#[allow(dead_code)]
pub fn client_state(base_url: &str, dir: &TempDir) -> ClientState {
    client_state_with(base_url, dir, LoginConfig::default())
}

#[allow(dead_code)]
pub fn client_state_with(base_url: &str, dir: &TempDir, login: LoginConfig) -> ClientState {
    ClientState::new(
        ApiConfig::default().with_base_url(base_url),
        login,
        StorageConfig {
            state_file: dir.path().join("state.json"),
        },
    )
    .unwrap()
}
