//! Mesh outbound adapter
//!
//! Binds one node handle from the shared registry and presents it through
//! the framework's outbound contract. Domain-name destinations are resolved
//! through the router and attempted serially; literal destinations go
//! straight to the session.

use async_trait::async_trait;
use meshgate_adapter::{
    dial_serial, listen_serial, new_direct_connection, new_direct_packet_connection,
    AdapterError, Conn, Context, Destination, DialError, Dialer, DomainStrategy, InboundContext,
    Network, Outbound, PacketConn, Router,
};
use meshgate_mesh::{MeshOutboundOptions, NodeHandle, NodeRegistry};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Outbound adapter dialing through one mesh node session
///
/// Multiple instances configured with the same node name share one handle;
/// closing any of them closes the node session for all.
pub struct MeshOutbound {
    tag: String,
    networks: Vec<Network>,
    router: Arc<dyn Router>,
    handle: Arc<NodeHandle>,
    connect_timeout: Option<Duration>,
}

impl std::fmt::Debug for MeshOutbound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshOutbound")
            .field("tag", &self.tag)
            .field("networks", &self.networks)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl MeshOutbound {
    /// Build a mesh outbound bound to the node named in `options`.
    ///
    /// Requires a `NodeRegistry` service on the context; its absence is a
    /// configuration error and fails construction immediately.
    pub fn new(
        ctx: &Context,
        router: Arc<dyn Router>,
        tag: impl Into<String>,
        options: MeshOutboundOptions,
    ) -> Result<Self, AdapterError> {
        let registry = ctx
            .service::<NodeRegistry>()
            .ok_or(AdapterError::MissingService("mesh node registry"))?;
        let handle = registry.load_or_create(&options.node);
        Ok(Self {
            tag: tag.into(),
            networks: Network::build_list(&options.network),
            router,
            handle,
            connect_timeout: options.dialer.connect_timeout(),
        })
    }

    pub fn node(&self) -> &str {
        self.handle.name()
    }

    async fn start_node(&self) -> Result<(), AdapterError> {
        self.handle.start().await.map_err(AdapterError::lifecycle)
    }

    async fn dial_literal(
        &self,
        ctx: &Context,
        network: Network,
        destination: &Destination,
    ) -> io::Result<Conn> {
        match self.connect_timeout {
            Some(timeout) => {
                tokio::time::timeout(timeout, self.handle.dial(ctx, network, destination))
                    .await
                    .map_err(|_| {
                        io::Error::new(
                            io::ErrorKind::TimedOut,
                            format!("dial {} timed out", destination),
                        )
                    })?
            }
            None => self.handle.dial(ctx, network, destination).await,
        }
    }
}

#[async_trait]
impl Outbound for MeshOutbound {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn network(&self) -> &[Network] {
        &self.networks
    }

    /// Starts the shared node session; `post_start` repeats this at the
    /// later framework phase, both idempotent.
    async fn start(&self) -> Result<(), AdapterError> {
        self.start_node().await
    }

    async fn post_start(&self) -> Result<(), AdapterError> {
        self.start_node().await
    }

    async fn close(&self) -> Result<(), AdapterError> {
        self.handle.close().await.map_err(AdapterError::lifecycle)
    }

    async fn dial_context(
        &self,
        ctx: &Context,
        network: Network,
        destination: &Destination,
    ) -> Result<Conn, DialError> {
        match network {
            Network::Tcp => {
                info!(tag = %self.tag, destination = %destination, "outbound connection")
            }
            Network::Udp => {
                info!(tag = %self.tag, destination = %destination, "outbound packet connection")
            }
        }
        if let Some(domain) = destination.domain() {
            let addresses = self.router.lookup_default(ctx, domain).await?;
            return dial_serial(ctx, self.handle.as_ref(), network, destination, &addresses).await;
        }
        Ok(self.dial_literal(ctx, network, destination).await?)
    }

    async fn listen_packet(
        &self,
        ctx: &Context,
        destination: &Destination,
    ) -> Result<Box<dyn PacketConn>, DialError> {
        info!(tag = %self.tag, destination = %destination, "outbound packet connection");
        if let Some(domain) = destination.domain() {
            let addresses = self.router.lookup_default(ctx, domain).await?;
            let (conn, _) =
                listen_serial(ctx, self.handle.as_ref(), destination, &addresses).await?;
            return Ok(conn);
        }
        Ok(self.handle.listen_packet(ctx, destination).await?)
    }

    async fn new_connection(
        &self,
        ctx: &Context,
        conn: Conn,
        metadata: &InboundContext,
    ) -> Result<(), DialError> {
        new_direct_connection(
            ctx,
            self.router.as_ref(),
            self,
            conn,
            metadata,
            DomainStrategy::AsIs,
        )
        .await
    }

    async fn new_packet_connection(
        &self,
        ctx: &Context,
        conn: Box<dyn PacketConn>,
        metadata: &InboundContext,
    ) -> Result<(), DialError> {
        new_direct_packet_connection(
            ctx,
            self.router.as_ref(),
            self,
            conn,
            metadata,
            DomainStrategy::AsIs,
        )
        .await
    }
}
