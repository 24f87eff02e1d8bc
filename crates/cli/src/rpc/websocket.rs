// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket implementation of [`RpcClient`].
//!
//! Each call sends one JSON [`Request`] frame and waits for the [`Reply`]
//! carrying the same id. Calls are serialized: only one request is in flight
//! per connection. Every exchange is bounded by the configured timeout; a
//! transport failure or timeout drops the connection so the next call fails
//! fast with [`Error::NotConnected`].

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use mnemo_core::{Entity, HealthStatus, Method, Namespace, Reply, ReplyBody, Request};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::debug;

use super::client::{RpcClient, RpcFuture};
use crate::connection::ConnectionConfig;
use crate::error::{Error, Result};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Knowledge-store client over a WebSocket.
pub struct WebSocketClient {
    url: String,
    timeout: Duration,
    ws: Mutex<Option<WsStream>>,
    connected: AtomicBool,
    next_id: AtomicU64,
}

impl WebSocketClient {
    /// Creates an unconnected client for the configured endpoint.
    pub fn new(config: &ConnectionConfig) -> Self {
        WebSocketClient {
            url: config.url(),
            timeout: config.timeout(),
            ws: Mutex::new(None),
            connected: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call(&self, method: Method) -> Result<ReplyBody> {
        let name = method.name();
        let mut guard = self.ws.lock().await;
        let ws = guard.as_mut().ok_or(Error::NotConnected)?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let json = Request::new(id, method).to_json()?;

        let outcome = match tokio::time::timeout(self.timeout, exchange(ws, id, json)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(format!(
                "{} got no reply within {:?}",
                name, self.timeout
            ))),
        };

        let reply = match outcome {
            Ok(reply) => reply,
            Err(e) => {
                debug!(error = %e, "dropping connection after failed exchange");
                *guard = None;
                self.connected.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        reply
            .into_result()
            .map_err(|status| Error::from_remote(name, status))
    }
}

/// Sends one request frame and waits for the reply with the same id.
async fn exchange(ws: &mut WsStream, id: u64, json: String) -> Result<Reply> {
    ws.send(Message::Text(json.into())).await?;
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => {
                let reply = Reply::from_json(&text)?;
                if reply.id != id {
                    debug!(expected = id, got = reply.id, "dropping stale reply");
                    continue;
                }
                return Ok(reply);
            }
            Some(Ok(Message::Close(_))) | None => {
                return Err(Error::Connection("closed by server".to_string()));
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(e.into()),
        }
    }
}

fn unexpected(method: &str, body: &ReplyBody) -> Error {
    Error::Protocol(format!("unexpected reply to {}: {:?}", method, body))
}

impl RpcClient for WebSocketClient {
    fn connect(&self) -> RpcFuture<'_, ()> {
        Box::pin(async move {
            let mut guard = self.ws.lock().await;
            if guard.is_some() {
                return Ok(());
            }
            let (stream, _) =
                tokio::time::timeout(self.timeout, tokio_tungstenite::connect_async(&self.url))
                    .await
                    .map_err(|_| {
                        Error::Timeout(format!("connecting to {} took over {:?}", self.url, self.timeout))
                    })??;
            *guard = Some(stream);
            self.connected.store(true, Ordering::SeqCst);
            debug!(url = %self.url, "websocket connected");
            Ok(())
        })
    }

    fn disconnect(&self) -> RpcFuture<'_, ()> {
        Box::pin(async move {
            let stream = self.ws.lock().await.take();
            self.connected.store(false, Ordering::SeqCst);
            if let Some(mut ws) = stream {
                if let Err(e) = ws.close(None).await {
                    debug!(error = %e, "websocket close failed");
                }
            }
            Ok(())
        })
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn health_check(&self) -> RpcFuture<'_, HealthStatus> {
        Box::pin(async move {
            match self.call(Method::HealthCheck).await? {
                ReplyBody::Health { status } if status.healthy => Ok(status),
                ReplyBody::Health { status } => Err(Error::Unavailable(format!(
                    "server {} reports unhealthy",
                    status.version
                ))),
                body => Err(unexpected("health check", &body)),
            }
        })
    }

    fn store_entity(&self, entity: Entity) -> RpcFuture<'_, Entity> {
        Box::pin(async move {
            match self.call(Method::StoreEntity { entity }).await? {
                ReplyBody::Entity { entity } => Ok(entity),
                body => Err(unexpected("store entity", &body)),
            }
        })
    }

    fn get_entity(&self, entity_id: String) -> RpcFuture<'_, Entity> {
        Box::pin(async move {
            match self.call(Method::GetEntity { entity_id }).await? {
                ReplyBody::Entity { entity } => Ok(entity),
                body => Err(unexpected("get entity", &body)),
            }
        })
    }

    fn update_entity(&self, entity: Entity) -> RpcFuture<'_, Entity> {
        Box::pin(async move {
            match self.call(Method::UpdateEntity { entity }).await? {
                ReplyBody::Entity { entity } => Ok(entity),
                body => Err(unexpected("update entity", &body)),
            }
        })
    }

    fn delete_entity(&self, entity_id: String) -> RpcFuture<'_, ()> {
        Box::pin(async move {
            match self.call(Method::DeleteEntity { entity_id }).await? {
                ReplyBody::Deleted => Ok(()),
                body => Err(unexpected("delete entity", &body)),
            }
        })
    }

    fn list_entities(&self, namespace: Option<Namespace>) -> RpcFuture<'_, Vec<Entity>> {
        Box::pin(async move {
            match self.call(Method::ListEntities { namespace }).await? {
                ReplyBody::Entities { entities } => Ok(entities),
                body => Err(unexpected("list entities", &body)),
            }
        })
    }
}

#[cfg(test)]
#[path = "websocket_tests.rs"]
mod tests;
