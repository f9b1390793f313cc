//! Connection objects exchanged between adapters and the framework

use crate::address::Destination;
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};

/// Byte-stream connection usable as a trait object
pub trait AsyncStream: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> AsyncStream for T {}

impl std::fmt::Debug for dyn AsyncStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AsyncStream")
    }
}

/// Boxed stream connection returned by dial operations
pub type Conn = Box<dyn AsyncStream>;

/// Datagram connection returned by packet listen operations
///
/// Implementations must tolerate concurrent send/recv from multiple tasks.
#[async_trait]
pub trait PacketConn: Send + Sync {
    /// Receive a single datagram into `buf`, returning its length and source
    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)>;

    /// Send a single datagram to `destination`
    async fn send_to(&self, buf: &[u8], destination: &Destination) -> io::Result<usize>;

    /// Local address the connection is bound to
    fn local_addr(&self) -> io::Result<SocketAddr>;

    /// Close the connection; further operations fail
    async fn close(&self) -> io::Result<()>;
}

impl std::fmt::Debug for dyn PacketConn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PacketConn")
    }
}
