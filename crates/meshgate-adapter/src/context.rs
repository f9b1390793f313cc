//! Ambient execution context: cancellation plus shared service injection
//!
//! The framework builds one `Context` at startup, registers shared services
//! on it (the mesh node registry among them), and passes it down through
//! adapter construction and per-connection operations. Services are keyed by
//! their concrete type, so an adapter asks for exactly the type it needs.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Shared execution context for adapters and per-connection operations
#[derive(Clone, Default)]
pub struct Context {
    cancel: CancellationToken,
    services: Arc<RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared service instance, replacing any previous one of the
    /// same type.
    pub fn insert_service<T: Send + Sync + 'static>(&self, service: Arc<T>) {
        let mut services = self.services.write().unwrap();
        services.insert(TypeId::of::<T>(), service);
    }

    /// Look up a previously registered service by type.
    pub fn service<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let services = self.services.read().unwrap();
        services
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|service| service.downcast::<T>().ok())
    }

    /// Derive a context that shares services but can be cancelled
    /// independently; cancelling the parent cancels the child too.
    pub fn child(&self) -> Context {
        Context {
            cancel: self.cancel.child_token(),
            services: self.services.clone(),
        }
    }

    /// Cancel all operations running under this context
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Future that resolves when this context is cancelled
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.cancel.cancelled()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
