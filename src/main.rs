// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use bank_onboarding::api::router;
use bank_onboarding::auth::TokenKeys;
use bank_onboarding::config::{
    DATA_DIR_ENV, DB_FILE_NAME, DEFAULT_DATA_DIR, DEFAULT_JWT_SECRET, HOST_ENV, JWT_SECRET_ENV,
    LOG_FORMAT_ENV, PORT_ENV,
};
use bank_onboarding::state::AppState;
use bank_onboarding::storage::LinkDatabase;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if env::var(LOG_FORMAT_ENV).as_deref() == Ok("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    // Open the embedded database.
    let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
    let db_path = PathBuf::from(&data_dir).join(DB_FILE_NAME);
    let db = LinkDatabase::open(&db_path).expect("Failed to open onboarding database");
    tracing::info!(path = %db_path.display(), "Onboarding database ready");

    // Bearer-token keys from the shared secret.
    let secret = env::var(JWT_SECRET_ENV).unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET_KEY not set, using development fallback secret");
        DEFAULT_JWT_SECRET.to_string()
    });
    let token_keys = TokenKeys::from_secret(secret.as_bytes());

    let state = AppState::new(db, token_keys);
    let app = router(state);

    // Parse bind address
    let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(PORT_ENV)
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    // Graceful shutdown on ctrl-c.
    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown_handle.graceful_shutdown(Some(Duration::from_secs(10)));
        }
    });

    tracing::info!("Bank onboarding server listening on http://{addr} (docs at /docs)");
    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .expect("HTTP server failed");
}
