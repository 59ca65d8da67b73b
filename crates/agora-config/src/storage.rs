use std::env;
use std::path::PathBuf;

/// Where durable client state (the `currentSchoolId` key) is kept.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub state_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(".agora/state.json"),
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            state_file: env::var("AGORA_STATE_FILE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".agora/state.json")),
        }
    }
}
