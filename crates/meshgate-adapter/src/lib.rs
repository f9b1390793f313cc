//! Adapter interface layer for the meshgate proxy framework
//!
//! Defines the contracts outbound adapters implement and the shared pieces
//! they are built from: the destination address model, connection trait
//! objects, the ambient execution context with cancellation and service
//! injection, the router collaborator, serial connection-attempt helpers,
//! and generic direct-forwarding helpers.

pub mod address;
pub mod conn;
pub mod context;
pub mod dialer;
pub mod direct;
pub mod error;
pub mod outbound;
pub mod router;
pub mod serial;

pub use address::{AddressError, Destination, Host, Network};
pub use conn::{AsyncStream, Conn, PacketConn};
pub use context::Context;
pub use dialer::Dialer;
pub use direct::{new_direct_connection, new_direct_packet_connection, DomainStrategy};
pub use error::{AdapterError, DialError, SerialAttemptsError};
pub use outbound::{InboundContext, Outbound};
pub use router::{ResolveError, Router};
pub use serial::{dial_serial, listen_serial};
