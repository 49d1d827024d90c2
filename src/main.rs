//! Authgate HTTP service entry point.
//!
//! # Purpose
//! Wires configuration, storage, the token service, and the HTTP router,
//! then starts the API server and the metrics listener.
//!
//! # Notes
//! The `build_state` helper keeps wiring testable and minimizes main setup logic.
mod api;
mod app;
mod auth;
mod config;
mod model;
mod observability;
mod store;

use anyhow::Context;
use app::{build_router, AppState};
use auth::token::TokenService;
use std::future::Future;
use std::sync::Arc;
use store::{memory::InMemoryStore, seed, AccessStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::AuthGateConfig::from_env_or_yaml().context("authgate config")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: config::AuthGateConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability();
    if config.token_secret == config::DEV_TOKEN_SECRET {
        tracing::warn!("running with the built-in development token secret");
    }
    let state = build_state(&config).await?;
    let backend_name = state.store.backend_name();
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state);

    let addr = config.bind_addr;
    tracing::info!(%addr, backend = backend_name, "authgate listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}

async fn build_state(config: &config::AuthGateConfig) -> anyhow::Result<AppState> {
    let store: Arc<dyn AccessStore> = Arc::new(InMemoryStore::new());
    if config.seed_demo_data {
        seed::seed_demo_data(store.as_ref(), config.bcrypt_cost)
            .await
            .context("seed demo data")?;
        tracing::info!("seeded demo roles, elements, and accounts");
    }
    Ok(AppState {
        store,
        tokens: Arc::new(TokenService::new(
            &config.token_secret,
            config.token_ttl_secs,
        )),
        bcrypt_cost: config.bcrypt_cost,
        enforce_sessions: config.enforce_sessions,
    })
}
