//! End-to-end forwarding through a mesh outbound with a mock session

use async_trait::async_trait;
use meshgate_adapter::{
    Conn, Context, Destination, DialError, InboundContext, Network, Outbound, PacketConn,
    ResolveError, Router,
};
use meshgate_mesh::{
    MeshOptions, MeshOutboundOptions, MeshSession, NodeRegistry, ResolvedNodeConfig, SessionError,
    SessionFactory,
};
use meshgate_outbound::MeshOutbound;
use std::io;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Session whose dialed connections echo everything back
struct EchoSession;

#[async_trait]
impl MeshSession for EchoSession {
    async fn start(&self) -> Result<(), SessionError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), SessionError> {
        Ok(())
    }

    async fn dial(&self, _network: Network, _address: &str) -> io::Result<Conn> {
        let (client, server) = tokio::io::duplex(256);
        tokio::spawn(async move {
            let (mut reader, mut writer) = tokio::io::split(server);
            let _ = tokio::io::copy(&mut reader, &mut writer).await;
        });
        Ok(Box::new(client))
    }

    async fn listen_packet(&self, _address: &str) -> io::Result<Box<dyn PacketConn>> {
        Err(io::ErrorKind::Unsupported.into())
    }
}

/// Session whose dials never complete
struct StuckSession;

#[async_trait]
impl MeshSession for StuckSession {
    async fn start(&self) -> Result<(), SessionError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), SessionError> {
        Ok(())
    }

    async fn dial(&self, _network: Network, _address: &str) -> io::Result<Conn> {
        std::future::pending().await
    }

    async fn listen_packet(&self, _address: &str) -> io::Result<Box<dyn PacketConn>> {
        std::future::pending().await
    }
}

struct StaticFactory(Arc<dyn MeshSession>);

impl SessionFactory for StaticFactory {
    fn create(&self, _config: &ResolvedNodeConfig) -> Arc<dyn MeshSession> {
        self.0.clone()
    }
}

struct StaticRouter(Vec<IpAddr>);

#[async_trait]
impl Router for StaticRouter {
    async fn lookup_default(
        &self,
        _ctx: &Context,
        _domain: &str,
    ) -> Result<Vec<IpAddr>, ResolveError> {
        Ok(self.0.clone())
    }
}

fn setup(session: Arc<dyn MeshSession>, addresses: &[&str]) -> (Context, MeshOutbound) {
    let ctx = Context::new();
    let registry = NodeRegistry::new(MeshOptions::default(), Arc::new(StaticFactory(session)));
    ctx.insert_service(Arc::new(registry));

    let router = Arc::new(StaticRouter(
        addresses.iter().map(|s| s.parse().unwrap()).collect(),
    ));
    let options = MeshOutboundOptions {
        node: "gateway".to_string(),
        ..Default::default()
    };
    let outbound = MeshOutbound::new(&ctx, router, "mesh-out", options).unwrap();
    (ctx, outbound)
}

fn metadata(destination: Destination) -> InboundContext {
    InboundContext {
        network: Network::Tcp,
        source: "127.0.0.1:41000".parse().unwrap(),
        destination,
    }
}

#[tokio::test]
async fn new_connection_forwards_bytes_through_the_session() {
    let (ctx, outbound) = setup(Arc::new(EchoSession), &[]);
    let (mut inbound_local, inbound_remote) = tokio::io::duplex(256);
    let meta = metadata(Destination::from_ip("198.51.100.9".parse().unwrap(), 443));

    let forward = tokio::spawn(async move {
        outbound
            .new_connection(&ctx, Box::new(inbound_remote), &meta)
            .await
    });

    inbound_local.write_all(b"ping").await.unwrap();
    let mut buf = [0u8; 4];
    inbound_local.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"ping");

    drop(inbound_local);
    forward.await.unwrap().unwrap();
}

#[tokio::test]
async fn new_connection_forwards_domain_destinations() {
    // The forwarding helper passes the domain through as-is; the outbound's
    // own dial path resolves it and attempts the candidates serially
    let (ctx, outbound) = setup(Arc::new(EchoSession), &["192.0.2.5"]);
    let (mut inbound_local, inbound_remote) = tokio::io::duplex(256);
    let meta = metadata(Destination::from_domain("service.internal", 8080));

    let forward = tokio::spawn(async move {
        outbound
            .new_connection(&ctx, Box::new(inbound_remote), &meta)
            .await
    });

    inbound_local.write_all(b"hello").await.unwrap();
    let mut buf = [0u8; 5];
    inbound_local.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"hello");

    drop(inbound_local);
    forward.await.unwrap().unwrap();
}

#[tokio::test]
async fn cancellation_aborts_domain_dial_mid_attempt() {
    let (ctx, outbound) = setup(Arc::new(StuckSession), &["192.0.2.1", "192.0.2.2"]);
    let destination = Destination::from_domain("stuck.example", 443);

    let canceller = {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            ctx.cancel();
        })
    };

    let err = outbound
        .dial_context(&ctx, Network::Tcp, &destination)
        .await
        .unwrap_err();
    assert!(matches!(err, DialError::Cancelled));
    canceller.await.unwrap();
}
