// ============================================================================
// Pending Mutation Tracking
// ============================================================================
//
// Implements the Command Pattern for reversible bag operations. Each pending
// mutation records the prior snapshot captured when the optimistic change was
// applied, so a failed remote call can be reverted exactly.
//
// ============================================================================

use crate::model::{BagItem, ItemPatch};
use crate::store::CollectionStore;

/// A single reversible change applied optimistically to the store.
#[derive(Debug, Clone)]
pub enum Change {
    /// Quantity update: `prior` is the store value at issue time, which may
    /// already be an earlier call's optimistic value rather than the last
    /// server-confirmed one.
    UpdateQuantity {
        id: String,
        prior: u32,
        requested: u32,
    },

    /// Item removal: the full record and its display index are remembered so
    /// rollback restores it at the original position.
    RemoveItem { index: usize, item: BagItem },
}

/// An in-flight mutation awaiting its remote response.
///
/// The sequence number is allocated in invocation order; reconciliation of a
/// request whose sequence number is no longer the latest for its item is
/// discarded, which closes the lost-update race between overlapping edits of
/// the same item.
#[derive(Debug, Clone)]
pub struct PendingMutation {
    seq: u64,
    change: Change,
}

impl PendingMutation {
    pub fn update(seq: u64, id: &str, prior: u32, requested: u32) -> Self {
        Self {
            seq,
            change: Change::UpdateQuantity {
                id: id.to_string(),
                prior,
                requested,
            },
        }
    }

    pub fn remove(seq: u64, index: usize, item: BagItem) -> Self {
        Self {
            seq,
            change: Change::RemoveItem { index, item },
        }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn item_id(&self) -> &str {
        match &self.change {
            Change::UpdateQuantity { id, .. } => id,
            Change::RemoveItem { item, .. } => &item.id,
        }
    }

    pub fn change(&self) -> &Change {
        &self.change
    }

    /// Undoes the optimistic application of this mutation.
    pub fn revert(&self, store: &mut CollectionStore) {
        match &self.change {
            Change::UpdateQuantity { id, prior, .. } => {
                store.apply(id, &ItemPatch::quantity(*prior));
            }
            Change::RemoveItem { index, item } => {
                store.insert_at(*index, item.clone());
            }
        }
    }
}
