/// Optimistic mutation controller tests
///
/// Covers the capture/apply/reconcile protocol end-to-end against a scripted
/// remote: confirmation, rollback, position-preserving restore, and the
/// supersede rule for overlapping edits of the same item.
use async_trait::async_trait;
use bagsync::model::{AddItemRequest, BagItem, Order, OrderForm};
use bagsync::mutation::MutationController;
use bagsync::remote::{RemoteDataService, RemoteError, RemoteResult};
use bagsync::store::CollectionStore;
use bagsync::BagError;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, RwLock, oneshot};

fn item(id: &str, quantity: u32) -> BagItem {
    BagItem {
        id: id.to_string(),
        product_id: format!("p-{id}"),
        name: format!("Product {id}"),
        category: "Shirts".to_string(),
        image: format!("{id}.jpg"),
        color: "Black".to_string(),
        size: "M".to_string(),
        unit_price: 100.0,
        quantity,
    }
}

/// One scripted remote response, optionally gated so a test can control
/// settlement order.
struct Scripted {
    fail: bool,
    /// Authoritative quantity override returned on success.
    authoritative: Option<u32>,
    /// Fired when the remote call begins.
    started: Option<oneshot::Sender<()>>,
    /// The call does not settle until this fires.
    gate: Option<oneshot::Receiver<()>>,
}

impl Scripted {
    fn ok() -> Self {
        Self {
            fail: false,
            authoritative: None,
            started: None,
            gate: None,
        }
    }

    fn ok_with(authoritative: u32) -> Self {
        Self {
            authoritative: Some(authoritative),
            ..Self::ok()
        }
    }

    fn fail() -> Self {
        Self {
            fail: true,
            ..Self::ok()
        }
    }

    fn gated(mut self) -> (Self, oneshot::Receiver<()>, oneshot::Sender<()>) {
        let (started_tx, started_rx) = oneshot::channel();
        let (gate_tx, gate_rx) = oneshot::channel();
        self.started = Some(started_tx);
        self.gate = Some(gate_rx);
        (self, started_rx, gate_tx)
    }
}

struct ScriptedRemote {
    responses: Mutex<VecDeque<Scripted>>,
    calls: AtomicUsize,
}

impl ScriptedRemote {
    fn new(responses: Vec<Scripted>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn next(&self) -> Scripted {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .await
            .pop_front()
            .expect("remote called more times than scripted")
    }

    async fn settle(&self, requested: u32) -> RemoteResult<u32> {
        let mut scripted = self.next().await;
        if let Some(started) = scripted.started.take() {
            let _ = started.send(());
        }
        if let Some(gate) = scripted.gate.take() {
            let _ = gate.await;
        }
        if scripted.fail {
            return Err(RemoteError::Status {
                status: 500,
                body: "scripted failure".to_string(),
            });
        }
        Ok(scripted.authoritative.unwrap_or(requested))
    }
}

#[async_trait]
impl RemoteDataService for ScriptedRemote {
    async fn fetch_bag(&self) -> RemoteResult<Vec<BagItem>> {
        Ok(Vec::new())
    }

    async fn update_quantity(&self, item_id: &str, quantity: u32) -> RemoteResult<BagItem> {
        let quantity = self.settle(quantity).await?;
        Ok(item(item_id, quantity))
    }

    async fn remove_item(&self, _item_id: &str) -> RemoteResult<()> {
        self.settle(0).await?;
        Ok(())
    }

    async fn add_item(&self, request: &AddItemRequest) -> RemoteResult<BagItem> {
        self.settle(request.quantity).await?;
        Ok(item("created", request.quantity))
    }

    async fn create_order(&self, _order: &OrderForm) -> RemoteResult<Order> {
        Err(RemoteError::Status {
            status: 500,
            body: "not under test".to_string(),
        })
    }
}

fn controller(
    items: Vec<BagItem>,
    responses: Vec<Scripted>,
) -> MutationController<ScriptedRemote> {
    let mut store = CollectionStore::new();
    store.initialize(items);
    MutationController::new(
        Arc::new(RwLock::new(store)),
        Arc::new(ScriptedRemote::new(responses)),
    )
}

async fn quantity_of(controller: &MutationController<ScriptedRemote>, id: &str) -> u32 {
    controller
        .store()
        .read()
        .await
        .get(id)
        .expect("item should exist")
        .quantity
}

#[tokio::test]
async fn sequential_successful_mutations_apply_in_order() {
    let controller = controller(
        vec![item("a", 2)],
        vec![Scripted::ok(), Scripted::ok(), Scripted::ok()],
    );

    controller.set_quantity("a", 3).await.unwrap();
    controller.set_quantity("a", 7).await.unwrap();
    controller.set_quantity("a", 4).await.unwrap();

    assert_eq!(quantity_of(&controller, "a").await, 4);
}

#[tokio::test]
async fn failed_mutation_reverts_to_value_at_issue_time() {
    let controller = controller(vec![item("a", 2)], vec![Scripted::fail()]);

    let err = controller.set_quantity("a", 5).await.unwrap_err();
    assert!(matches!(err, BagError::MutationFailed(_)));
    assert_eq!(quantity_of(&controller, "a").await, 2);
}

#[tokio::test]
async fn optimistic_value_visible_before_settlement() {
    let (scripted, started, gate) = Scripted::ok().gated();
    let controller = Arc::new(controller(vec![item("a", 2)], vec![scripted]));

    let task = tokio::spawn({
        let controller = controller.clone();
        async move { controller.set_quantity("a", 5).await }
    });
    started.await.unwrap();

    // In flight: the store already shows the optimistic value.
    assert_eq!(quantity_of(&controller, "a").await, 5);

    gate.send(()).unwrap();
    task.await.unwrap().unwrap();
    assert_eq!(quantity_of(&controller, "a").await, 5);
}

#[tokio::test]
async fn failed_removal_restores_record_at_original_index() {
    let controller = controller(
        vec![item("a", 2), item("b", 1)],
        vec![Scripted::fail()],
    );

    let err = controller.remove_item("a").await.unwrap_err();
    assert!(matches!(err, BagError::MutationFailed(_)));

    let snapshot = controller.store().read().await.snapshot();
    let ids: Vec<_> = snapshot.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(snapshot[0].quantity, 2);
}

#[tokio::test]
async fn removal_visible_before_settlement() {
    let (scripted, started, gate) = Scripted::fail().gated();
    let controller = Arc::new(controller(
        vec![item("a", 2), item("b", 1)],
        vec![scripted],
    ));

    let task = tokio::spawn({
        let controller = controller.clone();
        async move { controller.remove_item("a").await }
    });
    started.await.unwrap();

    let ids: Vec<_> = controller
        .store()
        .read()
        .await
        .snapshot()
        .iter()
        .map(|i| i.id.clone())
        .collect();
    assert_eq!(ids, vec!["b"]);

    gate.send(()).unwrap();
    assert!(task.await.unwrap().is_err());

    let ids: Vec<_> = controller
        .store()
        .read()
        .await
        .snapshot()
        .iter()
        .map(|i| i.id.clone())
        .collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn unknown_id_is_rejected_without_network_call() {
    let controller = controller(vec![item("a", 2)], Vec::new());

    let err = controller.set_quantity("missing", 5).await.unwrap_err();
    assert!(matches!(err, BagError::NotFound(_)));
    assert_eq!(controller.remote().call_count(), 0);
    assert_eq!(quantity_of(&controller, "a").await, 2);
}

#[tokio::test]
async fn repeated_identical_mutations_are_idempotent() {
    let controller = controller(
        vec![item("a", 2)],
        vec![Scripted::ok(), Scripted::ok()],
    );

    controller.set_quantity("a", 5).await.unwrap();
    controller.set_quantity("a", 5).await.unwrap();

    assert_eq!(quantity_of(&controller, "a").await, 5);
    assert_eq!(controller.store().read().await.len(), 1);
}

#[tokio::test]
async fn authoritative_payload_wins_over_requested_value() {
    // Server clamps the quantity to available stock.
    let controller = controller(vec![item("a", 2)], vec![Scripted::ok_with(3)]);

    controller.set_quantity("a", 10).await.unwrap();

    assert_eq!(quantity_of(&controller, "a").await, 3);
}

#[tokio::test]
async fn superseded_failure_does_not_clobber_later_mutation() {
    // First update hangs and eventually fails; a second update for the same
    // item is issued and settles first. The stale rollback must be discarded.
    let (first, first_started, first_gate) = Scripted::fail().gated();
    let (second, second_started, second_gate) = Scripted::ok().gated();
    let controller = Arc::new(controller(vec![item("a", 2)], vec![first, second]));

    let first_task = tokio::spawn({
        let controller = controller.clone();
        async move { controller.set_quantity("a", 5).await }
    });
    first_started.await.unwrap();

    let second_task = tokio::spawn({
        let controller = controller.clone();
        async move { controller.set_quantity("a", 7).await }
    });
    second_started.await.unwrap();

    // Later-issued request resolves first.
    second_gate.send(()).unwrap();
    second_task.await.unwrap().unwrap();
    assert_eq!(quantity_of(&controller, "a").await, 7);

    // The earlier request's failure still surfaces, but its rollback is
    // discarded because it was superseded.
    first_gate.send(()).unwrap();
    let err = first_task.await.unwrap().unwrap_err();
    assert!(matches!(err, BagError::MutationFailed(_)));
    assert_eq!(quantity_of(&controller, "a").await, 7);
}

#[tokio::test]
async fn overlapping_failure_rolls_back_to_value_at_issue_time() {
    // First update (2 -> 5) is pending when the second (-> 7) is issued, so
    // the second captures 5 as its prior. When the second fails it restores
    // 5, not the original server value.
    let (first, first_started, first_gate) = Scripted::ok().gated();
    let (second, second_started, second_gate) = Scripted::fail().gated();
    let controller = Arc::new(controller(vec![item("a", 2)], vec![first, second]));

    let first_task = tokio::spawn({
        let controller = controller.clone();
        async move { controller.set_quantity("a", 5).await }
    });
    first_started.await.unwrap();

    let second_task = tokio::spawn({
        let controller = controller.clone();
        async move { controller.set_quantity("a", 7).await }
    });
    second_started.await.unwrap();

    first_gate.send(()).unwrap();
    first_task.await.unwrap().unwrap();

    second_gate.send(()).unwrap();
    assert!(second_task.await.unwrap().is_err());

    assert_eq!(quantity_of(&controller, "a").await, 5);
}

#[tokio::test]
async fn failed_add_leaves_store_unchanged() {
    let controller = controller(vec![item("a", 2)], vec![Scripted::fail()]);

    let err = controller
        .add_item(&AddItemRequest {
            product_id: "p1".to_string(),
            variant_color_id: "c1".to_string(),
            variant_size_id: "s1".to_string(),
            quantity: 1,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, BagError::MutationFailed(_)));
    assert_eq!(controller.store().read().await.len(), 1);
}

#[tokio::test]
async fn store_notifies_on_rollback() {
    let controller = controller(vec![item("a", 2)], vec![Scripted::fail()]);
    let mut revision = controller.store().read().await.subscribe();
    let before = *revision.borrow_and_update();

    let _ = controller.set_quantity("a", 5).await;

    // One notification for the optimistic apply, one for the rollback.
    assert_eq!(*revision.borrow_and_update(), before + 2);
}
