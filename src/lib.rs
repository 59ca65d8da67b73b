//! # Agora
//!
//! Client for the Agora school-management API, focused on the OTP-gated
//! login handshake and the session it produces.
//!
//! ## Overview
//!
//! A login runs in up to three steps:
//!
//! ```text
//! credentials ──► /auth/login ──► requiresOtp? ──► six-digit code ──► /auth/verify-login-otp
//!                                     │                                         │
//!                                     └── tokens (legacy path) ──────┐          │
//!                                                                    ▼          ▼
//!                                                         session store + currentSchoolId
//!                                                                    │
//!                                                                    ▼
//!                                                           role dashboard path
//! ```
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── agora-core/           # ClientError, response envelope, serde helpers
//! ├── agora-config/         # Environment-driven configuration
//! ├── agora-models/         # Wire DTOs, typed IDs, roles, validated values
//! ├── agora-auth/           # API port, login steps, stores, LoginFlow
//! └── agora-observability/  # Logging, auth spans, login metrics
//! src/
//! ├── state.rs              # Wiring from environment
//! └── main.rs               # `agora` terminal client
//! ```
//!
//! ## Dashboards
//!
//! | Role | Landing path |
//! |------|--------------|
//! | `SUPER_ADMIN` | `/dashboard/super-admin` |
//! | `SCHOOL_ADMIN` | `/dashboard/school` |
//! | `TEACHER` | `/dashboard/teacher` |
//! | `STUDENT` | `/dashboard/student` |
//! | anything else | `/dashboard` |
//!
//! ## Configuration
//!
//! | Variable | Default |
//! |----------|---------|
//! | `AGORA_API_URL` | `http://localhost:4000` |
//! | `AGORA_REQUEST_TIMEOUT_SECS` | `30` |
//! | `AGORA_STATE_FILE` | `.agora/state.json` |
//! | `AGORA_ALLOW_LEGACY_LOGIN` | `true` |
//! | `LOG_LEVEL` | `info` |
//! | `OBSERVABILITY_ENABLED` | `true` |
//! | `AGORA_LOG_DIR` | `storage/logs` |

pub mod state;

pub use agora_auth as auth;
pub use agora_config as config;
pub use agora_models as models;
pub use agora_observability as observability;

pub use agora_core::{ApiResponse, ClientError};
pub use state::{ClientState, init_client_state};
