use agora::ClientState;
use agora_auth::{CURRENT_SCHOOL_ID_KEY, KeyValueStore};
use tracing::{debug, info};

pub fn handle_status(state: &ClientState) -> anyhow::Result<()> {
    let school_id = state.durable.get(CURRENT_SCHOOL_ID_KEY)?;
    debug!(
        path = %state.durable.path().display(),
        remembered = school_id.is_some(),
        "Read client state"
    );
    match school_id {
        Some(school_id) => println!("Current school: {}", school_id),
        None => println!("No school remembered"),
    }
    println!("   State file: {}", state.durable.path().display());
    Ok(())
}

pub fn handle_logout(state: &ClientState) -> anyhow::Result<()> {
    state.flow.logout();
    info!("Cleared session and remembered school");
    println!("✅ Logged out");
    Ok(())
}
