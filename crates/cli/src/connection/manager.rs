// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection manager.
//!
//! All mutable state lives behind one lock that is never held across an
//! await. Background work (periodic health checks, the reconnection loop,
//! post-reconnect sync) runs in spawned tasks tied to cancellation tokens:
//! - `lifetime` is cancelled when the manager is dropped
//! - `session` is a child of `lifetime`, replaced on every disconnect
//! - the health checker runs under a child of `session`

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::config::ConnectionConfig;
use crate::error::{ClassifiedError, Error, Result};
use crate::rpc::{ClientFactory, RpcClient, WebSocketClient};
use crate::sync::{OfflineCache, SyncQueue};

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
    Failed,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Reconnecting => "reconnecting",
            ConnectionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Called with the cause each time the manager enters offline mode.
pub type ErrorCallback = Arc<dyn Fn(Arc<Error>) + Send + Sync>;

pub(super) struct State<C> {
    pub(super) status: ConnectionStatus,
    pub(super) client: Option<Arc<C>>,
    pub(super) attempts: u32,
    pub(super) offline: bool,
    pub(super) last_error: Option<Arc<Error>>,
    pub(super) on_error: Option<ErrorCallback>,
    session: CancellationToken,
    health: Option<CancellationToken>,
}

impl<C> State<C> {
    fn stop_health_check(&mut self) {
        if let Some(token) = self.health.take() {
            token.cancel();
        }
    }
}

pub(super) struct Inner<C> {
    pub(super) config: ConnectionConfig,
    factory: ClientFactory<C>,
    pub(super) state: Mutex<State<C>>,
    pub(super) queue: Arc<SyncQueue>,
    pub(super) cache: Arc<OfflineCache>,
    /// Serializes sync replays.
    pub(super) sync_gate: tokio::sync::Mutex<()>,
    lifetime: CancellationToken,
}

/// Owns the RPC client and keeps it connected.
///
/// The sync queue and offline cache are created with the manager and survive
/// reconnects. Dropping the manager stops all background tasks.
pub struct ConnectionManager<C: RpcClient = WebSocketClient> {
    pub(super) inner: Arc<Inner<C>>,
}

impl ConnectionManager<WebSocketClient> {
    /// Creates a manager that dials the store over WebSocket.
    pub fn new(config: ConnectionConfig) -> Self {
        Self::with_factory(config, |config: &ConnectionConfig| {
            Ok(WebSocketClient::new(config))
        })
    }
}

impl<C: RpcClient> ConnectionManager<C> {
    /// Creates a manager that builds a fresh client with `factory` for each dial.
    pub fn with_factory<F>(config: ConnectionConfig, factory: F) -> Self
    where
        F: Fn(&ConnectionConfig) -> Result<C> + Send + Sync + 'static,
    {
        let lifetime = CancellationToken::new();
        let state = State {
            status: ConnectionStatus::Disconnected,
            client: None,
            attempts: 0,
            offline: false,
            last_error: None,
            on_error: None,
            session: lifetime.child_token(),
            health: None,
        };
        ConnectionManager {
            inner: Arc::new(Inner {
                config,
                factory: Box::new(factory),
                state: Mutex::new(state),
                queue: Arc::new(SyncQueue::new()),
                cache: Arc::new(OfflineCache::new()),
                sync_gate: tokio::sync::Mutex::new(()),
                lifetime,
            }),
        }
    }

    /// Connects to the store.
    ///
    /// Succeeds immediately when already connecting or connected. On failure
    /// the manager is left `Failed` and in offline mode.
    pub async fn connect(&self) -> Result<()> {
        self.inner.connect().await
    }

    /// Closes the connection and stops any reconnection in progress.
    pub async fn disconnect(&self) -> Result<()> {
        self.inner.disconnect().await
    }

    /// Probes the store. A failure starts reconnection in the background.
    pub async fn health_check(&self) -> Result<()> {
        self.inner.health_check().await
    }

    pub fn status(&self) -> ConnectionStatus {
        self.inner.state.lock().status
    }

    /// The live client, if connected.
    pub fn client(&self) -> Option<Arc<C>> {
        self.inner.state.lock().client.clone()
    }

    /// Failed reconnection attempts since the last successful connection.
    pub fn attempts(&self) -> u32 {
        self.inner.state.lock().attempts
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.inner.config
    }

    pub fn is_offline(&self) -> bool {
        self.inner.state.lock().offline
    }

    /// Most recent connection failure.
    pub fn last_error(&self) -> Option<Arc<Error>> {
        self.inner.state.lock().last_error.clone()
    }

    /// Registers the callback invoked whenever offline mode is entered.
    ///
    /// The callback runs on a spawned task, never under the manager's lock.
    pub fn set_error_callback<F>(&self, callback: F)
    where
        F: Fn(Arc<Error>) + Send + Sync + 'static,
    {
        self.inner.state.lock().on_error = Some(Arc::new(callback));
    }

    pub fn sync_queue(&self) -> Arc<SyncQueue> {
        Arc::clone(&self.inner.queue)
    }

    pub fn offline_cache(&self) -> Arc<OfflineCache> {
        Arc::clone(&self.inner.cache)
    }
}

impl<C: RpcClient> Drop for ConnectionManager<C> {
    fn drop(&mut self) {
        self.inner.lifetime.cancel();
    }
}

impl<C: RpcClient> Inner<C> {
    async fn connect(self: &Arc<Self>) -> Result<()> {
        let session = {
            let mut state = self.state.lock();
            if matches!(
                state.status,
                ConnectionStatus::Connecting | ConnectionStatus::Connected
            ) {
                return Ok(());
            }
            state.status = ConnectionStatus::Connecting;
            state.attempts = 0;
            state.session.clone()
        };
        info!(addr = %self.config.address(), "connecting");

        let client = match self.dial().await {
            Ok(client) => client,
            Err(e) => {
                let err = ClassifiedError::classify(
                    e,
                    format!("failed to connect to {}", self.config.address()),
                );
                let failed = {
                    let mut state = self.state.lock();
                    if state.status == ConnectionStatus::Connecting {
                        state.status = ConnectionStatus::Failed;
                        true
                    } else {
                        false
                    }
                };
                if failed {
                    self.enter_offline_mode(Error::Classified(err.clone()));
                }
                return Err(Error::Classified(err));
            }
        };

        let accepted = {
            let mut state = self.state.lock();
            if state.status == ConnectionStatus::Connecting && !session.is_cancelled() {
                state.status = ConnectionStatus::Connected;
                state.client = Some(Arc::clone(&client));
                state.attempts = 0;
                true
            } else {
                false
            }
        };
        if !accepted {
            debug!("disconnected while connecting, dropping new client");
            close(client.as_ref()).await;
            return Err(Error::NotConnected);
        }

        info!(addr = %self.config.address(), "connected");
        self.start_health_check();
        self.exit_offline_mode();
        Ok(())
    }

    /// Builds a client, connects it and checks liveness, all within the
    /// configured timeout.
    async fn dial(&self) -> Result<Arc<C>> {
        let client = (self.factory)(&self.config)?;
        let timeout = self.config.timeout();
        let handshake = async {
            client.connect().await?;
            client.health_check().await?;
            Ok::<_, Error>(())
        };
        let outcome = match tokio::time::timeout(timeout, handshake).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(format!(
                "no healthy answer from {} within {:?}",
                self.config.address(),
                timeout
            ))),
        };
        match outcome {
            Ok(()) => Ok(Arc::new(client)),
            Err(e) => {
                close(&client).await;
                Err(e)
            }
        }
    }

    async fn disconnect(&self) -> Result<()> {
        let client = {
            let mut state = self.state.lock();
            if state.status == ConnectionStatus::Disconnected {
                return Ok(());
            }
            state.stop_health_check();
            state.session.cancel();
            state.session = self.lifetime.child_token();
            state.status = ConnectionStatus::Disconnected;
            state.attempts = 0;
            state.client.take()
        };
        info!("disconnected");
        match client {
            Some(client) => client.disconnect().await,
            None => Ok(()),
        }
    }

    pub(super) async fn health_check(self: &Arc<Self>) -> Result<()> {
        let client = {
            let state = self.state.lock();
            match (state.status, &state.client) {
                (ConnectionStatus::Connected | ConnectionStatus::Reconnecting, Some(client)) => {
                    Arc::clone(client)
                }
                _ => return Err(Error::NotConnected),
            }
        };

        let timeout = self.config.timeout();
        let outcome = match tokio::time::timeout(timeout, client.health_check()).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(format!(
                "health check got no answer within {:?}",
                timeout
            ))),
        };
        match outcome {
            Ok(health) => {
                debug!(version = %health.version, "health check ok");
                Ok(())
            }
            Err(e) => {
                let err = ClassifiedError::classify(e, "health check failed");
                self.spawn_reconnect(Error::Classified(err.clone()));
                Err(Error::Classified(err))
            }
        }
    }

    fn start_health_check(self: &Arc<Self>) {
        let token = {
            let mut state = self.state.lock();
            if state.status != ConnectionStatus::Connected {
                return;
            }
            state.stop_health_check();
            let token = state.session.child_token();
            state.health = Some(token.clone());
            token
        };

        let period = self.config.health_check_interval();
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = inner.health_check().await {
                            debug!(error = %e, "periodic health check failed");
                        }
                    }
                }
            }
        });
    }

    /// Moves a connected manager to `Reconnecting` and starts the
    /// reconnection loop. Does nothing in any other state, so at most one
    /// loop runs at a time.
    pub(super) fn spawn_reconnect(self: &Arc<Self>, cause: Error) {
        let (stale, session) = {
            let mut state = self.state.lock();
            if state.status != ConnectionStatus::Connected {
                debug!(status = %state.status, "not reconnecting");
                return;
            }
            state.status = ConnectionStatus::Reconnecting;
            state.stop_health_check();
            state.attempts = 0;
            (state.client.take(), state.session.clone())
        };
        warn!(error = %cause, "connection lost, reconnecting");

        let inner = Arc::clone(self);
        tokio::spawn(async move {
            if let Some(client) = stale {
                close(client.as_ref()).await;
            }
            inner.enter_offline_mode(cause);
            inner.reconnect_loop(session).await;
        });
    }

    async fn reconnect_loop(self: Arc<Self>, session: CancellationToken) {
        let policy = *self.config.retry_policy();
        loop {
            let attempt = {
                let mut state = self.state.lock();
                if state.status != ConnectionStatus::Reconnecting {
                    debug!(status = %state.status, "reconnection abandoned");
                    return;
                }
                if policy.is_exhausted(state.attempts) {
                    state.status = ConnectionStatus::Failed;
                    warn!(attempts = state.attempts, "giving up on reconnection");
                    return;
                }
                state.attempts
            };

            let delay = policy.backoff(attempt);
            debug!(attempt = attempt + 1, ?delay, "reconnecting after backoff");
            let dialed = tokio::select! {
                _ = session.cancelled() => return,
                result = async {
                    tokio::time::sleep(delay).await;
                    self.dial().await
                } => result,
            };

            let client = match dialed {
                Ok(client) => client,
                Err(e) => {
                    debug!(attempt = attempt + 1, error = %e, "reconnect attempt failed");
                    let mut state = self.state.lock();
                    state.attempts += 1;
                    state.last_error = Some(Arc::new(e));
                    continue;
                }
            };

            let accepted = {
                let mut state = self.state.lock();
                if state.status == ConnectionStatus::Reconnecting && !session.is_cancelled() {
                    state.status = ConnectionStatus::Connected;
                    state.client = Some(Arc::clone(&client));
                    state.attempts = 0;
                    true
                } else {
                    false
                }
            };
            if !accepted {
                close(client.as_ref()).await;
                return;
            }

            info!(addr = %self.config.address(), "reconnected");
            self.start_health_check();
            self.exit_offline_mode();
            return;
        }
    }
}

async fn close<C: RpcClient + ?Sized>(client: &C) {
    if let Err(e) = client.disconnect().await {
        debug!(error = %e, "closing client failed");
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
