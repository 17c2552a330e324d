// ============================================================================
// bagsync Library
// ============================================================================

pub mod core;
pub mod model;
pub mod mutation;
pub mod remote;
pub mod server;
pub mod store;

// Re-export main types for convenience
pub use core::{BagError, Result};
pub use model::{AddItemRequest, BagItem, ItemPatch, Order, OrderForm, OrderStatus, OrderSummary};
pub use mutation::MutationController;
pub use remote::{HttpRemote, RemoteConfig, RemoteDataService, RemoteError};
pub use store::CollectionStore;

use std::sync::Arc;
use tokio::sync::{RwLock, watch};

// ============================================================================
// High-level Session API
// ============================================================================

/// One client session's view of the shopping bag.
///
/// Owns the local collection store and the mutation controller; every
/// mutation goes through the controller so the optimistic
/// capture/apply/reconcile protocol cannot be bypassed. The store holds the
/// session's current belief about the server-owned bag and reverts to the
/// last confirmed value whenever a remote call fails.
///
/// # Examples
///
/// ```no_run
/// use bagsync::{BagSession, HttpRemote, RemoteConfig};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let remote = HttpRemote::new(RemoteConfig::new("http://localhost:4000"))?;
/// let session = BagSession::load(remote).await?;
///
/// session.set_quantity("item-id", 3).await?;
/// let summary = session.summary().await;
/// println!("total: {}", summary.total);
/// # Ok(())
/// # }
/// ```
pub struct BagSession<R: RemoteDataService> {
    store: Arc<RwLock<CollectionStore>>,
    controller: MutationController<R>,
}

impl<R: RemoteDataService> BagSession<R> {
    /// Fetches the authoritative bag snapshot and builds a session over it.
    pub async fn load(remote: R) -> Result<Self> {
        let remote = Arc::new(remote);
        let items = remote.fetch_bag().await.map_err(BagError::MutationFailed)?;

        let mut store = CollectionStore::new();
        store.initialize(items);
        let store = Arc::new(RwLock::new(store));

        Ok(Self {
            controller: MutationController::new(store.clone(), remote),
            store,
        })
    }

    /// Builds a session over an already-fetched snapshot.
    pub fn with_items(remote: R, items: Vec<BagItem>) -> Self {
        let mut store = CollectionStore::new();
        store.initialize(items);
        let store = Arc::new(RwLock::new(store));

        Self {
            controller: MutationController::new(store.clone(), Arc::new(remote)),
            store,
        }
    }

    /// Current visible bag contents, display order preserved.
    pub async fn items(&self) -> Vec<BagItem> {
        self.store.read().await.snapshot()
    }

    /// Sets one item's quantity optimistically. See
    /// [`MutationController::set_quantity`].
    pub async fn set_quantity(&self, id: &str, quantity: u32) -> Result<()> {
        self.controller.set_quantity(id, quantity).await
    }

    /// Removes one item optimistically. See
    /// [`MutationController::remove_item`].
    pub async fn remove(&self, id: &str) -> Result<()> {
        self.controller.remove_item(id).await
    }

    /// Adds a product variant to the bag.
    pub async fn add(&self, request: &AddItemRequest) -> Result<BagItem> {
        self.controller.add_item(request).await
    }

    /// Validates and submits the checkout form.
    pub async fn place_order(&self, form: &OrderForm) -> Result<Order> {
        form.validate()?;
        self.controller
            .remote()
            .create_order(form)
            .await
            .map_err(BagError::MutationFailed)
    }

    /// Subtotal, shipping fee, and total over the current visible bag.
    pub async fn summary(&self) -> OrderSummary {
        OrderSummary::from_items(&self.items().await)
    }

    /// Revision watcher; changes whenever the visible bag changes.
    pub async fn subscribe(&self) -> watch::Receiver<u64> {
        self.store.read().await.subscribe()
    }

    pub fn controller(&self) -> &MutationController<R> {
        &self.controller
    }
}
