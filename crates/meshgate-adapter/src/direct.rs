//! Generic direct forwarding between an accepted inbound connection and an
//! outbound adapter
//!
//! Both helpers run on the calling task until the connection ends or the
//! context is cancelled; no background task is spawned.

use crate::address::Destination;
use crate::conn::{Conn, PacketConn};
use crate::context::Context;
use crate::error::{DialError, SerialAttemptsError};
use crate::outbound::{InboundContext, Outbound};
use crate::router::Router;
use tokio::io::copy_bidirectional;
use tracing::debug;

const MAX_DATAGRAM_SIZE: usize = 65535;

/// How a forwarding path treats domain-name destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainStrategy {
    /// Pass the destination through unchanged; the outbound decides how to
    /// resolve it.
    AsIs,
    /// Resolve the domain through the router before handing the destination
    /// to the outbound.
    Resolve,
}

async fn dial_with_strategy(
    ctx: &Context,
    router: &dyn Router,
    outbound: &dyn Outbound,
    metadata: &InboundContext,
    strategy: DomainStrategy,
) -> Result<Conn, DialError> {
    let destination = &metadata.destination;
    if strategy == DomainStrategy::AsIs || !destination.is_domain() {
        return outbound.dial_context(ctx, metadata.network, destination).await;
    }
    let domain = destination.domain().unwrap_or_default();
    let addresses = router.lookup_default(ctx, domain).await?;
    if addresses.is_empty() {
        return Err(DialError::NoAddresses(destination.to_string()));
    }
    let mut attempts = Vec::new();
    for address in addresses {
        let candidate = destination.with_ip(address);
        match outbound.dial_context(ctx, metadata.network, &candidate).await {
            Ok(conn) => return Ok(conn),
            Err(DialError::Io(err)) => {
                debug!(address = %candidate, error = %err, "forwarding dial attempt failed");
                attempts.push((address, err));
            }
            Err(other) => return Err(other),
        }
    }
    Err(SerialAttemptsError { attempts }.into())
}

/// Forward a stream connection through `outbound` and copy bytes both ways
/// until EOF or cancellation.
pub async fn new_direct_connection(
    ctx: &Context,
    router: &dyn Router,
    outbound: &dyn Outbound,
    mut conn: Conn,
    metadata: &InboundContext,
    strategy: DomainStrategy,
) -> Result<(), DialError> {
    let mut upstream = dial_with_strategy(ctx, router, outbound, metadata, strategy).await?;
    tokio::select! {
        _ = ctx.cancelled() => Err(DialError::Cancelled),
        result = copy_bidirectional(&mut conn, &mut upstream) => {
            result.map(|_| ()).map_err(DialError::from)
        }
    }
}

/// Forward a packet connection through `outbound`, relaying datagrams both
/// ways on the calling task until either side fails or the context is
/// cancelled.
pub async fn new_direct_packet_connection(
    ctx: &Context,
    router: &dyn Router,
    outbound: &dyn Outbound,
    conn: Box<dyn PacketConn>,
    metadata: &InboundContext,
    strategy: DomainStrategy,
) -> Result<(), DialError> {
    let destination = match strategy {
        DomainStrategy::AsIs => metadata.destination.clone(),
        DomainStrategy::Resolve if metadata.destination.is_domain() => {
            let domain = metadata.destination.domain().unwrap_or_default();
            let addresses = router.lookup_default(ctx, domain).await?;
            let address = addresses
                .first()
                .copied()
                .ok_or_else(|| DialError::NoAddresses(metadata.destination.to_string()))?;
            metadata.destination.with_ip(address)
        }
        DomainStrategy::Resolve => metadata.destination.clone(),
    };
    let upstream = outbound.listen_packet(ctx, &destination).await?;
    let reply_to: Destination = metadata.source.into();

    let mut up = vec![0u8; MAX_DATAGRAM_SIZE];
    let mut down = vec![0u8; MAX_DATAGRAM_SIZE];
    loop {
        tokio::select! {
            _ = ctx.cancelled() => return Err(DialError::Cancelled),
            received = conn.recv_from(&mut up) => {
                let (len, _) = received?;
                upstream.send_to(&up[..len], &destination).await?;
            }
            received = upstream.recv_from(&mut down) => {
                let (len, _) = received?;
                conn.send_to(&down[..len], &reply_to).await?;
            }
        }
    }
}
