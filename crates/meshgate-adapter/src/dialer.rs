//! Outbound dial capability

use crate::address::{Destination, Network};
use crate::conn::{Conn, PacketConn};
use crate::context::Context;
use async_trait::async_trait;
use std::io;

/// Capability to open outbound connections
///
/// Implementations must tolerate concurrent dial/listen calls from many
/// connections at once; the framework performs no locking around them.
#[async_trait]
pub trait Dialer: Send + Sync {
    /// Open a stream or datagram connection to a literal destination
    async fn dial(
        &self,
        ctx: &Context,
        network: Network,
        destination: &Destination,
    ) -> io::Result<Conn>;

    /// Bind a packet connection for traffic toward `destination`
    async fn listen_packet(
        &self,
        ctx: &Context,
        destination: &Destination,
    ) -> io::Result<Box<dyn PacketConn>>;
}
