//! Outbound adapter contract

use crate::address::{Destination, Network};
use crate::conn::{Conn, PacketConn};
use crate::context::Context;
use crate::error::{AdapterError, DialError};
use async_trait::async_trait;
use std::net::SocketAddr;

/// Metadata for a connection accepted by an inbound adapter
#[derive(Debug, Clone)]
pub struct InboundContext {
    pub network: Network,
    pub source: SocketAddr,
    pub destination: Destination,
}

/// Contract every outbound adapter implements for the framework
///
/// Lifecycle hooks are called in fixed order: `pre_start`, `start`,
/// `post_start`, and `close` on shutdown. All of them default to no-op
/// success; adapters override the phases they care about. Hooks may run
/// concurrently with in-flight connections and must be idempotent.
#[async_trait]
pub trait Outbound: Send + Sync {
    /// Routing tag identifying this adapter instance
    fn tag(&self) -> &str;

    /// Networks this adapter serves
    fn network(&self) -> &[Network];

    async fn pre_start(&self) -> Result<(), AdapterError> {
        Ok(())
    }

    async fn start(&self) -> Result<(), AdapterError> {
        Ok(())
    }

    async fn post_start(&self) -> Result<(), AdapterError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), AdapterError> {
        Ok(())
    }

    /// Notification that host network interfaces changed
    fn interface_updated(&self) {}

    /// Open an outbound connection to `destination`
    async fn dial_context(
        &self,
        ctx: &Context,
        network: Network,
        destination: &Destination,
    ) -> Result<Conn, DialError>;

    /// Bind an outbound packet connection for traffic toward `destination`
    async fn listen_packet(
        &self,
        ctx: &Context,
        destination: &Destination,
    ) -> Result<Box<dyn PacketConn>, DialError>;

    /// Forward an accepted inbound stream connection through this adapter
    async fn new_connection(
        &self,
        ctx: &Context,
        conn: Conn,
        metadata: &InboundContext,
    ) -> Result<(), DialError>;

    /// Forward an accepted inbound packet connection through this adapter
    async fn new_packet_connection(
        &self,
        ctx: &Context,
        conn: Box<dyn PacketConn>,
        metadata: &InboundContext,
    ) -> Result<(), DialError>;
}
