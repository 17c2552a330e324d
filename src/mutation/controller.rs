// ============================================================================
// Optimistic Mutation Controller
// ============================================================================
//
// Coordinates one bag mutation end-to-end: capture the prior value, apply the
// optimistic change synchronously, issue the remote call, then reconcile the
// store from the outcome. All mutation entry points go through here so the
// capture/apply/reconcile protocol cannot be bypassed.
//
// Lock order is always store before sequence table.
//
// ============================================================================

use crate::core::{BagError, Result};
use crate::model::{AddItemRequest, BagItem, ItemPatch};
use crate::mutation::PendingMutation;
use crate::remote::RemoteDataService;
use crate::store::CollectionStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

/// Applies requested mutations to the [`CollectionStore`] immediately, issues
/// the corresponding remote call, and reconciles the store from the outcome.
///
/// Every pending mutation carries a per-store sequence number. When a remote
/// response arrives for a request that has been superseded by a later
/// mutation of the same item, its reconciliation (rollback or server-wins
/// overwrite) is discarded, so overlapping edits of one item always settle to
/// the latest-issued value regardless of response arrival order.
///
/// There is no automatic retry: every failure is terminal for that attempt
/// and requires a new explicit call.
pub struct MutationController<R: RemoteDataService> {
    store: Arc<RwLock<CollectionStore>>,
    remote: Arc<R>,
    next_seq: AtomicU64,
    /// Latest issued sequence number per item id, cleared on settlement.
    latest: Mutex<HashMap<String, u64>>,
}

impl<R: RemoteDataService> MutationController<R> {
    pub fn new(store: Arc<RwLock<CollectionStore>>, remote: Arc<R>) -> Self {
        Self {
            store,
            remote,
            next_seq: AtomicU64::new(0),
            latest: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<RwLock<CollectionStore>> {
        &self.store
    }

    pub fn remote(&self) -> &Arc<R> {
        &self.remote
    }

    /// Sets the quantity of one bag item.
    ///
    /// The store reflects the new value before the remote call is issued; on
    /// failure it reverts to the value captured at issue time and the error
    /// surfaces as [`BagError::MutationFailed`]. A missing item fails with
    /// [`BagError::NotFound`] without any network call.
    pub async fn set_quantity(&self, id: &str, quantity: u32) -> Result<()> {
        if quantity < 1 {
            return Err(BagError::Validation(
                "quantity must be at least 1".to_string(),
            ));
        }

        let pending = {
            let mut store = self.store.write().await;
            let prior = store
                .get(id)
                .map(|item| item.quantity)
                .ok_or_else(|| BagError::NotFound(id.to_string()))?;

            store.apply(id, &ItemPatch::quantity(quantity));

            let seq = self.allocate_seq();
            self.latest.lock().await.insert(id.to_string(), seq);
            PendingMutation::update(seq, id, prior, quantity)
        };

        match self.remote.update_quantity(id, quantity).await {
            Ok(authoritative) => {
                // Confirmed; if the server answered with a different value,
                // the server wins.
                let server_wins = (authoritative.quantity != quantity)
                    .then(|| ItemPatch::quantity(authoritative.quantity));
                self.settle_success(&pending, server_wins).await;
                Ok(())
            }
            Err(err) => {
                if self.settle_failure(&pending).await {
                    warn!(item = id, error = %err, "quantity update rejected, rolled back");
                } else {
                    debug!(item = id, "superseded quantity update failed, reconciliation discarded");
                }
                Err(BagError::MutationFailed(err))
            }
        }
    }

    /// Removes one bag item.
    ///
    /// The record leaves the store before the remote call is issued; on
    /// failure it is reinserted at its original display position.
    pub async fn remove_item(&self, id: &str) -> Result<()> {
        let pending = {
            let mut store = self.store.write().await;
            let (index, item) = store
                .remove(id)
                .ok_or_else(|| BagError::NotFound(id.to_string()))?;

            let seq = self.allocate_seq();
            self.latest.lock().await.insert(id.to_string(), seq);
            PendingMutation::remove(seq, index, item)
        };

        match self.remote.remove_item(id).await {
            Ok(()) => {
                self.settle_success(&pending, None).await;
                Ok(())
            }
            Err(err) => {
                if self.settle_failure(&pending).await {
                    warn!(item = id, error = %err, "item removal rejected, restored");
                }
                Err(BagError::MutationFailed(err))
            }
        }
    }

    /// Adds a product variant to the bag.
    ///
    /// There is no optimistic insert: the server assigns the item id, so the
    /// created record is appended only once the remote call succeeds.
    pub async fn add_item(&self, request: &AddItemRequest) -> Result<BagItem> {
        request.validate()?;

        match self.remote.add_item(request).await {
            Ok(created) => {
                self.store.write().await.push(created.clone());
                Ok(created)
            }
            Err(err) => Err(BagError::MutationFailed(err)),
        }
    }

    fn allocate_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Settles a successful mutation. Applies the server-wins patch only if
    /// the request is still the latest for its item.
    async fn settle_success(&self, pending: &PendingMutation, server_wins: Option<ItemPatch>) {
        let mut store = self.store.write().await;
        let mut latest = self.latest.lock().await;
        if latest.get(pending.item_id()) == Some(&pending.seq()) {
            latest.remove(pending.item_id());
            if let Some(patch) = server_wins {
                debug!(item = pending.item_id(), "authoritative payload differs, server wins");
                store.apply(pending.item_id(), &patch);
            }
        }
    }

    /// Settles a failed mutation, reverting the optimistic change if the
    /// request is still the latest for its item. Returns whether a rollback
    /// happened.
    async fn settle_failure(&self, pending: &PendingMutation) -> bool {
        let mut store = self.store.write().await;
        let mut latest = self.latest.lock().await;
        if latest.get(pending.item_id()) == Some(&pending.seq()) {
            latest.remove(pending.item_id());
            pending.revert(&mut store);
            true
        } else {
            false
        }
    }
}
