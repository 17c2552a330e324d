// ============================================================================
// Local Collection Store
// ============================================================================
//
// In-memory, insertion-ordered view of a server-owned collection. This is the
// client's current belief about the bag: populated once from the server
// snapshot, then mutated only through the mutation controller so that every
// change follows the capture/apply/reconcile protocol.
//
// ============================================================================

use crate::model::{BagItem, ItemPatch};
use tokio::sync::watch;

/// Insertion-ordered collection of bag items, at most one record per id.
///
/// Pure in-memory structure; none of its operations fail. Every visible
/// change bumps a revision counter observable through [`subscribe`], which is
/// how dependent views learn they must re-render.
///
/// [`subscribe`]: CollectionStore::subscribe
pub struct CollectionStore {
    items: Vec<BagItem>,
    revision: watch::Sender<u64>,
}

impl CollectionStore {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            items: Vec::new(),
            revision,
        }
    }

    /// Replaces the entire contents with a server-provided snapshot.
    pub fn initialize(&mut self, items: Vec<BagItem>) {
        self.items = items;
        self.touch();
    }

    pub fn get(&self, id: &str) -> Option<&BagItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Index of `id` in display order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Merges `patch` into the record matching `id`. No-op if absent.
    /// Returns whether a record was changed.
    pub fn apply(&mut self, id: &str, patch: &ItemPatch) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                patch.merge_into(item);
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Deletes the record matching `id`, returning it with its index so a
    /// failed remote delete can restore it at the original position.
    /// No-op if absent.
    pub fn remove(&mut self, id: &str) -> Option<(usize, BagItem)> {
        let index = self.position(id)?;
        let item = self.items.remove(index);
        self.touch();
        Some((index, item))
    }

    /// Reinserts a record at `index`, clamped to the current length.
    pub fn insert_at(&mut self, index: usize, item: BagItem) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        self.touch();
    }

    /// Appends a server-created record to the end of the display order.
    pub fn push(&mut self, item: BagItem) {
        self.items.push(item);
        self.touch();
    }

    /// Current visible state, insertion order preserved.
    pub fn snapshot(&self) -> Vec<BagItem> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Receiver that observes the revision counter; changed whenever the
    /// visible state changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn touch(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

impl Default for CollectionStore {
    fn default() -> Self {
        Self::new()
    }
}
