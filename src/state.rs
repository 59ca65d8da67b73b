use agora_auth::{FileKeyValueStore, HttpAuthApi, InMemorySessionStore, LoginFlow};
use agora_config::{ApiConfig, LoginConfig, StorageConfig};
use agora_core::ClientError;
use std::sync::Arc;

/// Everything the client needs for one user, wired together.
#[derive(Clone)]
pub struct ClientState {
    pub api_config: ApiConfig,
    pub login_config: LoginConfig,
    pub storage_config: StorageConfig,
    pub sessions: Arc<InMemorySessionStore>,
    pub durable: Arc<FileKeyValueStore>,
    pub flow: Arc<LoginFlow>,
}

impl ClientState {
    pub fn new(
        api_config: ApiConfig,
        login_config: LoginConfig,
        storage_config: StorageConfig,
    ) -> Result<Self, ClientError> {
        let api = Arc::new(HttpAuthApi::new(api_config.clone())?);
        let sessions = Arc::new(InMemorySessionStore::new());
        let durable = Arc::new(FileKeyValueStore::new(storage_config.state_file.clone()));
        let flow = Arc::new(LoginFlow::new(
            api,
            sessions.clone(),
            durable.clone(),
            login_config.clone(),
        ));

        Ok(Self {
            api_config,
            login_config,
            storage_config,
            sessions,
            durable,
            flow,
        })
    }
}

pub fn init_client_state() -> Result<ClientState, ClientError> {
    ClientState::new(
        ApiConfig::from_env(),
        LoginConfig::from_env(),
        StorageConfig::from_env(),
    )
}
