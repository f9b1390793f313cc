//! Mesh session capability seam
//!
//! The actual mesh implementation (authentication, peer discovery, encrypted
//! transport) lives outside this crate. It plugs in through `SessionFactory`
//! and is consumed only through the narrow `MeshSession` capability below.

use crate::resolve::ResolvedNodeConfig;
use async_trait::async_trait;
use meshgate_adapter::{Conn, Network, PacketConn};
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Errors from the external session provider
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session IO error: {0}")]
    Io(#[from] io::Error),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("control plane error: {0}")]
    ControlPlane(String),
}

/// One established (or establishable) session with the overlay network
///
/// Implementations must tolerate concurrent `dial`/`listen_packet` calls;
/// the registry and handle perform no locking around them.
#[async_trait]
pub trait MeshSession: Send + Sync {
    /// Establish the session; must be safe to call once per session
    async fn start(&self) -> Result<(), SessionError>;

    /// Release all session resources; further dial/listen calls fail
    async fn close(&self) -> Result<(), SessionError>;

    /// Open an outbound connection through the overlay to `address`
    /// ("host:port" form)
    async fn dial(&self, network: Network, address: &str) -> io::Result<Conn>;

    /// Bind a packet connection on the overlay for traffic toward `address`
    async fn listen_packet(&self, address: &str) -> io::Result<Box<dyn PacketConn>>;
}

/// Constructs sessions from resolved per-node configuration
///
/// Construction must be lazy: a freshly created session must not acquire
/// network resources before `start` is called, because a session built while
/// losing a registry publication race is dropped without ever starting.
pub trait SessionFactory: Send + Sync {
    fn create(&self, config: &ResolvedNodeConfig) -> Arc<dyn MeshSession>;
}
