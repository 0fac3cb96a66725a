use std::sync::Arc;

use gate_server::auth::password::hash_password;
use gate_server::{Config, MemoryStore, Server, ServerState, Store, init_logger_with_file};
use shared::models::{ADMIN_ROLE_NAME, ADMIN_USERNAME, Capability, Role, User};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (.env) and logging
    dotenv::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    tracing::info!("Cluster gate starting...");

    // 2. Configuration
    let config = Config::from_env().inspect_err(|e| tracing::error!("{}", e))?;

    // 3. Store, seeded with the admin identity when a bootstrap password is given
    let store = Arc::new(MemoryStore::new());
    if let Ok(password) = std::env::var("BOOTSTRAP_ADMIN_PASSWORD")
        && !password.is_empty()
    {
        bootstrap_admin(store.as_ref(), &password).await?;
    }

    // 4. State + server
    let state = ServerState::new(config, store).inspect_err(|e| tracing::error!("{}", e))?;
    if let Err(e) = Server::new(state).run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

async fn bootstrap_admin(store: &MemoryStore, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let role = Role::new(ADMIN_ROLE_NAME, ADMIN_ROLE_NAME, Capability::MAX);
    let mut admin = User::new(ADMIN_USERNAME);
    admin.password = hash_password(password).map_err(|e| e.to_string())?;
    admin.roles.push(role.clone());

    store.create_or_update_role(role).await?;
    store.create_or_update_user(admin).await?;
    tracing::info!("Bootstrap admin user created");
    Ok(())
}
