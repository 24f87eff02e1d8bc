// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt::Write as _;

use mnemo_core::HealthStatus;
use tracing::debug;

use crate::cli::CheckArgs;
use crate::config::Settings;
use crate::connection::{ConnectionManager, ConnectionStatus};
use crate::error::{Error, ErrorNotification, Result};
use crate::rpc::RpcClient;

/// Outcome of a single connection probe.
#[derive(Debug)]
pub struct CheckReport {
    pub address: String,
    pub status: ConnectionStatus,
    pub offline: bool,
    pub health: Option<HealthStatus>,
    pub failure: Option<Error>,
}

impl CheckReport {
    /// Renders the report as shown on stdout.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "address: {}", self.address);
        let _ = writeln!(out, "status: {}", self.status);
        if let Some(health) = &self.health {
            let version = if health.version.is_empty() {
                "unknown"
            } else {
                health.version.as_str()
            };
            let _ = writeln!(
                out,
                "server: {} (up {})",
                version,
                format_uptime(health.uptime_secs)
            );
        }
        if self.offline {
            let _ = writeln!(out, "mode: offline");
        }
        if let Some(err) = &self.failure {
            let notification = ErrorNotification::from_error(err);
            let _ = writeln!(out, "{}", notification.message);
            let _ = writeln!(out, "action: {}", notification.action);
        }
        out
    }
}

fn format_uptime(secs: u64) -> String {
    match secs {
        s if s < 60 => format!("{}s", s),
        s if s < 3600 => format!("{}m{}s", s / 60, s % 60),
        s => format!("{}h{}m", s / 3600, (s % 3600) / 60),
    }
}

/// Applies command-line overrides on top of the loaded settings.
pub fn apply_args(settings: &mut Settings, args: &CheckArgs) {
    if let Some(host) = &args.host {
        settings.host = host.clone();
    }
    if let Some(port) = args.port {
        settings.port = port;
    }
    if args.tls {
        settings.use_tls = true;
    }
    if let Some(ms) = args.timeout_ms {
        settings.timeout_ms = ms;
    }
}

async fn connect_and_query<C: RpcClient>(manager: &ConnectionManager<C>) -> Result<HealthStatus> {
    manager.connect().await?;
    let client = manager.client().ok_or(Error::NotConnected)?;
    client.health_check().await
}

/// Connects once through `manager` and reports what happened.
pub async fn probe<C: RpcClient>(manager: &ConnectionManager<C>) -> CheckReport {
    let address = manager.config().address();
    debug!(%address, "probing knowledge store");

    let (health, failure) = match connect_and_query(manager).await {
        Ok(health) => (Some(health), None),
        Err(e) => (None, Some(e)),
    };
    CheckReport {
        address,
        status: manager.status(),
        offline: manager.is_offline(),
        health,
        failure,
    }
}

/// `mnemo check`
pub async fn run(mut settings: Settings, args: CheckArgs) -> Result<()> {
    apply_args(&mut settings, &args);
    if !settings.enabled {
        println!("remote store disabled; working offline with cached data");
        return Ok(());
    }

    let manager = ConnectionManager::new(settings.connection_config()?);
    let report = probe(&manager).await;
    print!("{}", report.render());
    manager.disconnect().await?;

    match report.failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
