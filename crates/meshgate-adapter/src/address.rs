//! Destination address model shared by inbound metadata and outbound dialing

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

/// Transport-layer network of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Tcp,
    Udp,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Tcp => "tcp",
            Network::Udp => "udp",
        }
    }

    /// Expand a configured network list into the effective one.
    ///
    /// An empty list means the adapter serves both networks.
    pub fn build_list(networks: &[Network]) -> Vec<Network> {
        if networks.is_empty() {
            vec![Network::Tcp, Network::Udp]
        } else {
            networks.to_vec()
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host part of a destination: either a literal IP or a domain name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Host {
    Ip(IpAddr),
    Domain(String),
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Host::Ip(ip) => write!(f, "{}", ip),
            Host::Domain(domain) => f.write_str(domain),
        }
    }
}

/// A connection destination in "host:port" form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    pub host: Host,
    pub port: u16,
}

impl Destination {
    pub fn new(host: Host, port: u16) -> Self {
        Self { host, port }
    }

    pub fn from_ip(ip: IpAddr, port: u16) -> Self {
        Self {
            host: Host::Ip(ip),
            port,
        }
    }

    pub fn from_domain(domain: impl Into<String>, port: u16) -> Self {
        Self {
            host: Host::Domain(domain.into()),
            port,
        }
    }

    /// Whether this destination needs name resolution before dialing
    pub fn is_domain(&self) -> bool {
        matches!(self.host, Host::Domain(_))
    }

    /// Domain name of this destination, if it has one
    pub fn domain(&self) -> Option<&str> {
        match &self.host {
            Host::Domain(domain) => Some(domain),
            Host::Ip(_) => None,
        }
    }

    /// Rewrite the host with a resolved candidate address, keeping the port.
    ///
    /// Used by the serial attempt loop to try each resolved address in turn.
    pub fn with_ip(&self, ip: IpAddr) -> Destination {
        Destination {
            host: Host::Ip(ip),
            port: self.port,
        }
    }

    pub fn socket_addr(&self) -> Option<SocketAddr> {
        match self.host {
            Host::Ip(ip) => Some(SocketAddr::new(ip, self.port)),
            Host::Domain(_) => None,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.host {
            Host::Ip(IpAddr::V6(ip)) => write!(f, "[{}]:{}", ip, self.port),
            Host::Ip(IpAddr::V4(ip)) => write!(f, "{}:{}", ip, self.port),
            Host::Domain(domain) => write!(f, "{}:{}", domain, self.port),
        }
    }
}

impl From<SocketAddr> for Destination {
    fn from(addr: SocketAddr) -> Self {
        Destination::from_ip(addr.ip(), addr.port())
    }
}

/// Destination parse errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("missing port in address: {0}")]
    MissingPort(String),

    #[error("invalid port in address: {0}")]
    InvalidPort(String),
}

impl FromStr for Destination {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Bracketed IPv6 first, since it contains colons of its own
        if let Ok(addr) = s.parse::<SocketAddr>() {
            return Ok(addr.into());
        }
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| AddressError::MissingPort(s.to_string()))?;
        let port = port
            .parse::<u16>()
            .map_err(|_| AddressError::InvalidPort(s.to_string()))?;
        match host.parse::<IpAddr>() {
            Ok(ip) => Ok(Destination::from_ip(ip, port)),
            Err(_) => Ok(Destination::from_domain(host, port)),
        }
    }
}
