// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `smajobb serve` command implementation.
//!
//! Wires the gateway together: SQLite storage, the in-process rate-limit
//! store, the notification sink, and the job directory, then serves the
//! HTTP surface until the process is stopped.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use smajobb_config::model::SmajobbConfig;
use smajobb_core::traits::{JobDirectory, JobSummary, NotificationKind, NotificationSink};
use smajobb_core::types::{JobRef, UserId};
use smajobb_core::GatewayError;
use smajobb_gateway::{AuthConfig, GatewayState, MessagingGateway, ServerConfig};
use smajobb_ratelimit::{MemoryStore, RateLimiter};
use smajobb_storage::Database;

/// Notification sink that logs deliveries. Stands in until the platform
/// notification service is wired up; the gateway contract (notify after
/// durability, never fail the send) is the same either way.
struct TracingNotificationSink;

#[async_trait]
impl NotificationSink for TracingNotificationSink {
    async fn notify(
        &self,
        user: &UserId,
        kind: NotificationKind,
        title: &str,
        _body: &str,
        link: Option<&str>,
    ) -> Result<(), GatewayError> {
        info!(user = %user, kind = %kind, title, link = ?link, "notification dispatched");
        Ok(())
    }
}

/// Job directory placeholder. The job subsystem lives in another service;
/// until its lookup endpoint is consumed here, conversations render
/// without job decoration.
struct UnlinkedJobDirectory;

#[async_trait]
impl JobDirectory for UnlinkedJobDirectory {
    async fn job_summary(&self, _job_ref: &JobRef) -> Result<Option<JobSummary>, GatewayError> {
        Ok(None)
    }
}

/// Runs the `smajobb serve` command.
pub async fn run_serve(config: SmajobbConfig) -> Result<(), GatewayError> {
    init_tracing(&config.gateway.log_level);

    info!("starting smajobb gateway");

    if config.gateway.bearer_token.is_none() {
        warn!("no gateway.bearer_token configured -- all API requests will be rejected");
    }

    let db = Database::open_with_options(&config.storage.database_path, config.storage.wal_mode)
        .await?;
    info!(path = %config.storage.database_path, "storage ready");

    let limiter = RateLimiter::new(Arc::new(MemoryStore::new()));
    spawn_rate_limit_sweeper(limiter.clone(), config.rate_limit.interval_secs);

    let gateway = Arc::new(MessagingGateway::new(
        db,
        limiter,
        Arc::new(TracingNotificationSink),
        Arc::new(UnlinkedJobDirectory),
        config.rate_limit.clone(),
        config.safety.clone(),
    ));

    let state = GatewayState {
        gateway,
        auth: AuthConfig {
            bearer_token: config.gateway.bearer_token.clone(),
        },
    };
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    smajobb_gateway::start_server(&server_config, state).await
}

/// Periodically drops expired rate-limit windows. The in-process store
/// has no TTL, so without this it keeps one counter per (user, window)
/// for the life of the process.
fn spawn_rate_limit_sweeper(limiter: RateLimiter, interval_secs: i64) {
    let period = std::time::Duration::from_secs(interval_secs.max(1) as u64);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await; // first tick fires immediately
        loop {
            ticker.tick().await;
            limiter.sweep(interval_secs);
        }
    });
}

/// Runs the `smajobb migrate` command: opening the database applies all
/// pending migrations.
pub async fn run_migrate(config: &SmajobbConfig) -> Result<(), GatewayError> {
    init_tracing(&config.gateway.log_level);
    let db = Database::open_with_options(&config.storage.database_path, config.storage.wal_mode)
        .await?;
    db.close().await?;
    info!(path = %config.storage.database_path, "migrations applied");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("smajobb={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
