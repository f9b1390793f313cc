//! Outbound adapters for meshgate

pub mod mesh;

pub use mesh::MeshOutbound;
