//! Serial connection attempts across resolved candidate addresses
//!
//! A domain-name destination resolves to an ordered list of addresses; the
//! helpers here try them one at a time on the calling task, stopping at the
//! first success. Cancelling the context aborts the in-flight attempt and
//! skips the remaining candidates.

use crate::address::{Destination, Network};
use crate::conn::{Conn, PacketConn};
use crate::context::Context;
use crate::dialer::Dialer;
use crate::error::{DialError, SerialAttemptsError};
use std::net::IpAddr;
use tracing::debug;

/// Dial `destination` through `dialer`, trying each candidate address in
/// order and returning the first successful connection.
///
/// Fails with an aggregated error naming every candidate if all attempts
/// fail, or with `DialError::Cancelled` if the context is cancelled first.
pub async fn dial_serial(
    ctx: &Context,
    dialer: &dyn Dialer,
    network: Network,
    destination: &Destination,
    addresses: &[IpAddr],
) -> Result<Conn, DialError> {
    if addresses.is_empty() {
        return Err(DialError::NoAddresses(destination.to_string()));
    }
    let mut attempts = Vec::new();
    for &address in addresses {
        let candidate = destination.with_ip(address);
        tokio::select! {
            _ = ctx.cancelled() => return Err(DialError::Cancelled),
            result = dialer.dial(ctx, network, &candidate) => match result {
                Ok(conn) => return Ok(conn),
                Err(err) => {
                    debug!(address = %candidate, error = %err, "connection attempt failed");
                    attempts.push((address, err));
                }
            }
        }
    }
    Err(SerialAttemptsError { attempts }.into())
}

/// Bind a packet connection for `destination`, trying each candidate address
/// in order and returning the first successful bind together with the
/// address that succeeded.
pub async fn listen_serial(
    ctx: &Context,
    dialer: &dyn Dialer,
    destination: &Destination,
    addresses: &[IpAddr],
) -> Result<(Box<dyn PacketConn>, IpAddr), DialError> {
    if addresses.is_empty() {
        return Err(DialError::NoAddresses(destination.to_string()));
    }
    let mut attempts = Vec::new();
    for &address in addresses {
        let candidate = destination.with_ip(address);
        tokio::select! {
            _ = ctx.cancelled() => return Err(DialError::Cancelled),
            result = dialer.listen_packet(ctx, &candidate) => match result {
                Ok(conn) => return Ok((conn, address)),
                Err(err) => {
                    debug!(address = %candidate, error = %err, "listen attempt failed");
                    attempts.push((address, err));
                }
            }
        }
    }
    Err(SerialAttemptsError { attempts }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::io;
    use std::net::SocketAddr;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Mock dialer with per-address outcomes, recording attempt order
    struct MockDialer {
        failing: HashSet<IpAddr>,
        pending: bool,
        attempts: Mutex<Vec<IpAddr>>,
    }

    impl MockDialer {
        fn new(failing: &[&str]) -> Self {
            Self {
                failing: failing.iter().map(|s| s.parse().unwrap()).collect(),
                pending: false,
                attempts: Mutex::new(Vec::new()),
            }
        }

        fn pending() -> Self {
            Self {
                failing: HashSet::new(),
                pending: true,
                attempts: Mutex::new(Vec::new()),
            }
        }

        fn attempts(&self) -> Vec<IpAddr> {
            self.attempts.lock().unwrap().clone()
        }

        fn record(&self, destination: &Destination) -> io::Result<()> {
            let ip = match destination.host {
                crate::address::Host::Ip(ip) => ip,
                _ => panic!("serial attempts must use literal addresses"),
            };
            self.attempts.lock().unwrap().push(ip);
            if self.failing.contains(&ip) {
                Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"))
            } else {
                Ok(())
            }
        }
    }

    struct MockPacketConn(SocketAddr);

    #[async_trait]
    impl PacketConn for MockPacketConn {
        async fn recv_from(&self, _buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
            Err(io::ErrorKind::WouldBlock.into())
        }

        async fn send_to(&self, buf: &[u8], _destination: &Destination) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn local_addr(&self) -> io::Result<SocketAddr> {
            Ok(self.0)
        }

        async fn close(&self) -> io::Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl Dialer for MockDialer {
        async fn dial(
            &self,
            _ctx: &Context,
            _network: Network,
            destination: &Destination,
        ) -> io::Result<Conn> {
            if self.pending {
                std::future::pending::<()>().await;
            }
            self.record(destination)?;
            let (client, _server) = tokio::io::duplex(64);
            Ok(Box::new(client))
        }

        async fn listen_packet(
            &self,
            _ctx: &Context,
            destination: &Destination,
        ) -> io::Result<Box<dyn PacketConn>> {
            if self.pending {
                std::future::pending::<()>().await;
            }
            self.record(destination)?;
            Ok(Box::new(MockPacketConn(destination.socket_addr().unwrap())))
        }
    }

    fn dest() -> Destination {
        Destination::from_domain("example.com", 443)
    }

    fn addrs(list: &[&str]) -> Vec<IpAddr> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[tokio::test]
    async fn test_dial_serial_falls_back_and_short_circuits() {
        let ctx = Context::new();
        let dialer = MockDialer::new(&["192.0.2.1"]);
        let candidates = addrs(&["192.0.2.1", "192.0.2.2", "192.0.2.3"]);

        let conn = dial_serial(&ctx, &dialer, Network::Tcp, &dest(), &candidates).await;
        assert!(conn.is_ok());

        // First candidate fails, second succeeds, third is never attempted
        assert_eq!(dialer.attempts(), addrs(&["192.0.2.1", "192.0.2.2"]));
    }

    #[tokio::test]
    async fn test_dial_serial_aggregates_all_failures() {
        let ctx = Context::new();
        let dialer = MockDialer::new(&["192.0.2.1", "192.0.2.2"]);
        let candidates = addrs(&["192.0.2.1", "192.0.2.2"]);

        let err = dial_serial(&ctx, &dialer, Network::Tcp, &dest(), &candidates)
            .await
            .unwrap_err();
        match err {
            DialError::AllAttemptsFailed(aggregate) => {
                assert_eq!(aggregate.attempts.len(), 2);
                let rendered = aggregate.to_string();
                assert!(rendered.contains("192.0.2.1"));
                assert!(rendered.contains("192.0.2.2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_dial_serial_empty_candidates() {
        let ctx = Context::new();
        let dialer = MockDialer::new(&[]);

        let err = dial_serial(&ctx, &dialer, Network::Tcp, &dest(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, DialError::NoAddresses(_)));
        assert!(dialer.attempts().is_empty());
    }

    #[tokio::test]
    async fn test_dial_serial_cancellation_aborts_in_flight_attempt() {
        let ctx = Context::new();
        let dialer = MockDialer::pending();
        let candidates = addrs(&["192.0.2.1", "192.0.2.2"]);

        let canceller = {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                ctx.cancel();
            })
        };

        let err = dial_serial(&ctx, &dialer, Network::Tcp, &dest(), &candidates)
            .await
            .unwrap_err();
        assert!(matches!(err, DialError::Cancelled));
        canceller.await.unwrap();
    }

    #[tokio::test]
    async fn test_listen_serial_binds_first_success() {
        let ctx = Context::new();
        let dialer = MockDialer::new(&["192.0.2.1"]);
        let candidates = addrs(&["192.0.2.1", "192.0.2.2"]);

        let (conn, bound) = listen_serial(&ctx, &dialer, &dest(), &candidates)
            .await
            .unwrap();
        assert_eq!(bound, "192.0.2.2".parse::<IpAddr>().unwrap());
        assert_eq!(conn.local_addr().unwrap().port(), 443);
    }

    #[tokio::test]
    async fn test_listen_serial_aggregates_all_failures() {
        let ctx = Context::new();
        let dialer = MockDialer::new(&["192.0.2.1", "192.0.2.2"]);
        let candidates = addrs(&["192.0.2.1", "192.0.2.2"]);

        let err = listen_serial(&ctx, &dialer, &dest(), &candidates)
            .await
            .unwrap_err();
        assert!(matches!(err, DialError::AllAttemptsFailed(_)));
    }
}
