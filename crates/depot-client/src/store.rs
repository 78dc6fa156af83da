//! # Inventory Store
//!
//! Cached view of the warehouse network plus the commands that change it.
//!
//! ## Phase Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         InventoryStore Phases                           │
//! │                                                                         │
//! │  ┌───────────────┐  load_all   ┌─────────┐   ok    ┌─────────┐          │
//! │  │ Uninitialized │────────────►│ Loading │────────►│  Ready  │◄─┐       │
//! │  └───────────────┘             └────┬────┘         └────┬────┘  │       │
//! │                                 err │    ▲              │       │ err   │
//! │                                     ▼    │ retry        │ update│       │
//! │                                ┌─────────┴┐             ▼       │       │
//! │                                │  Failed  │        ┌──────────┐ │       │
//! │                                └──────────┘        │ Updating │─┘       │
//! │                                                    └────┬─────┘         │
//! │                                                      ok │ (reconcile)   │
//! │                                                         ▼               │
//! │                                                      Loading            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Single Fetch In Flight
//! Every `load_all` call takes a ticket. A fetch serves every ticket issued
//! before it started, so callers that queue behind an in-flight fetch share
//! one follow-up fetch instead of each issuing their own. No lock is held
//! across a gateway call except the load guard itself.

use chrono::{DateTime, Utc};
use depot_core::{
    filter, rank_by_distance, select_optimal, Coordinate, CoreError, InventoryUpdate,
    OrderConfirmation, OrderRequest, ValidationError, Warehouse, WarehouseId, WarehouseSet,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::{ClientError, ClientResult};
use crate::events::{NoOpEmitter, StoreEventEmitter};
use crate::gateway::WarehouseGateway;

// =============================================================================
// Store Phase
// =============================================================================

/// Lifecycle phase of the store, for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StorePhase {
    /// Constructed, nothing fetched yet.
    #[default]
    Uninitialized,

    /// A fetch is in flight.
    Loading,

    /// The cached set reflects the last successful fetch.
    Ready,

    /// The last fetch failed; the previous set (if any) is still served.
    Failed,

    /// An inventory update is in flight.
    Updating,
}

impl std::fmt::Display for StorePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorePhase::Uninitialized => write!(f, "uninitialized"),
            StorePhase::Loading => write!(f, "loading"),
            StorePhase::Ready => write!(f, "ready"),
            StorePhase::Failed => write!(f, "failed"),
            StorePhase::Updating => write!(f, "updating"),
        }
    }
}

// =============================================================================
// Derived Views
// =============================================================================

/// A warehouse with its distance to a query point.
///
/// Owned, so it never outlives a refresh as a stale reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimalWarehouse {
    pub warehouse: Warehouse,
    pub distance_km: f64,
}

/// Point-in-time copy of the store for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub phase: StorePhase,
    pub warehouses: WarehouseSet,
    /// Error of the last failed fetch; cleared by the next successful one.
    pub last_error: Option<ClientError>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct StoreState {
    phase: StorePhase,
    warehouses: WarehouseSet,
    last_error: Option<ClientError>,
    refreshed_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Inventory Store
// =============================================================================

/// Cache of the warehouse set in front of a [`WarehouseGateway`].
///
/// Share it as `Arc<InventoryStore<G>>`; every method takes `&self`.
pub struct InventoryStore<G> {
    gateway: G,
    state: RwLock<StoreState>,
    emitter: Arc<dyn StoreEventEmitter>,

    /// Held for the duration of a fetch.
    load_guard: Mutex<()>,
    /// Tickets issued so far.
    load_requests: AtomicU64,
    /// Highest ticket served by a finished fetch.
    completed_through: AtomicU64,
}

impl<G: WarehouseGateway> InventoryStore<G> {
    /// Creates an empty store. Nothing is fetched until [`load_all`](Self::load_all).
    pub fn new(gateway: G) -> Self {
        Self::with_emitter(gateway, Arc::new(NoOpEmitter))
    }

    /// Creates an empty store with a custom event emitter.
    pub fn with_emitter(gateway: G, emitter: Arc<dyn StoreEventEmitter>) -> Self {
        InventoryStore {
            gateway,
            state: RwLock::new(StoreState::default()),
            emitter,
            load_guard: Mutex::new(()),
            load_requests: AtomicU64::new(0),
            completed_through: AtomicU64::new(0),
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Fetches the full warehouse list and replaces the cached set.
    ///
    /// On success the set is swapped wholesale and any previous error is
    /// cleared. On failure the store moves to `Failed`, keeps the previous
    /// set and retains the error. Retrying from `Failed` is always allowed.
    pub async fn load_all(&self) -> ClientResult<()> {
        let ticket = self.load_requests.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = self.load_guard.lock().await;

        if self.completed_through.load(Ordering::SeqCst) >= ticket {
            debug!(ticket, "Load coalesced into a fetch that started after it");
            return self.last_load_outcome().await;
        }

        let covers = self.load_requests.load(Ordering::SeqCst);
        self.set_phase(StorePhase::Loading).await;

        let result = match self.gateway.fetch_all().await {
            Ok(list) => WarehouseSet::try_from_vec(list)
                .map_err(|e| ClientError::InvalidPayload(e.to_string())),
            Err(e) => Err(e),
        };

        let outcome = match result {
            Ok(set) => {
                let count = set.len();
                {
                    let mut state = self.state.write().await;
                    state.warehouses = set;
                    state.last_error = None;
                    state.refreshed_at = Some(Utc::now());
                    state.phase = StorePhase::Ready;
                }
                info!(count, "Warehouses refreshed");
                self.emitter.emit_phase(StorePhase::Ready);
                self.emitter.emit_refreshed(count);
                Ok(())
            }
            Err(e) => {
                {
                    let mut state = self.state.write().await;
                    state.last_error = Some(e.clone());
                    state.phase = StorePhase::Failed;
                }
                warn!(error = %e, "Failed to load warehouses");
                self.emitter.emit_phase(StorePhase::Failed);
                self.emitter.emit_error("load", &e);
                Err(e)
            }
        };

        self.completed_through.store(covers, Ordering::SeqCst);
        outcome
    }

    async fn last_load_outcome(&self) -> ClientResult<()> {
        match &self.state.read().await.last_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current phase.
    pub async fn phase(&self) -> StorePhase {
        self.state.read().await.phase
    }

    /// Copy of the cached set.
    pub async fn warehouses(&self) -> WarehouseSet {
        self.state.read().await.warehouses.clone()
    }

    /// Phase, set, last error and refresh time in one read.
    pub async fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.read().await;
        StoreSnapshot {
            phase: state.phase,
            warehouses: state.warehouses.clone(),
            last_error: state.last_error.clone(),
            refreshed_at: state.refreshed_at,
        }
    }

    /// Warehouses whose name contains `term`, ignoring case.
    ///
    /// An empty term returns the whole set in server order.
    pub async fn search(&self, term: &str) -> Vec<Warehouse> {
        let state = self.state.read().await;
        filter::search(&state.warehouses, term)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Hides out-of-stock items when `only_in_stock` is set.
    ///
    /// Never drops a warehouse.
    pub fn filter_stocked(warehouses: &[Warehouse], only_in_stock: bool) -> Vec<Warehouse> {
        filter::filter_stocked(warehouses, only_in_stock)
    }

    /// Search then stock filter: exactly what the list screen renders.
    pub async fn view(&self, term: &str, only_in_stock: bool) -> Vec<Warehouse> {
        let state = self.state.read().await;
        filter::filter_stocked(filter::search(&state.warehouses, term), only_in_stock)
    }

    /// The warehouse nearest to `query` in the current set.
    ///
    /// Recomputed on every call. An empty set is `NotFound`.
    pub async fn optimal_warehouse(&self, query: Coordinate) -> ClientResult<OptimalWarehouse> {
        let state = self.state.read().await;
        select_optimal(state.warehouses.as_slice(), query)
            .map(|s| OptimalWarehouse {
                warehouse: s.warehouse.clone(),
                distance_km: s.distance_km,
            })
            .ok_or_else(|| CoreError::NoWarehouses.into())
    }

    /// Every cached warehouse with its distance to `query`, nearest first.
    pub async fn rank_by_distance(&self, query: Coordinate) -> Vec<OptimalWarehouse> {
        let state = self.state.read().await;
        rank_by_distance(state.warehouses.as_slice(), query)
            .into_iter()
            .map(|s| OptimalWarehouse {
                warehouse: s.warehouse.clone(),
                distance_km: s.distance_km,
            })
            .collect()
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Sets a product's quantity at a warehouse, then reloads.
    ///
    /// ## Flow
    /// 1. Local checks: the warehouse must be in the set, the name non-empty,
    ///    the quantity a non-negative whole number. Failing any of them makes
    ///    no gateway call.
    /// 2. Gateway update. On failure the set is untouched and the phase goes
    ///    back to `Ready` (or stays `Failed` if the last fetch failed).
    /// 3. Exactly one reconciling [`load_all`](Self::load_all); its outcome
    ///    is the outcome of this call.
    pub async fn update_inventory(
        &self,
        warehouse_id: WarehouseId,
        product_name: &str,
        quantity_raw: &str,
    ) -> ClientResult<()> {
        let update = match self.prepare_update(warehouse_id, product_name, quantity_raw).await {
            Ok(update) => update,
            Err(e) => {
                debug!(%warehouse_id, error = %e, "Inventory update rejected locally");
                self.emitter.emit_error("update_inventory", &e);
                return Err(e);
            }
        };

        let previous = self.replace_phase(StorePhase::Updating).await;

        if let Err(e) = self.gateway.update_inventory(&update).await {
            warn!(%warehouse_id, error = %e, "Inventory update failed");
            let restored = if previous == StorePhase::Failed {
                StorePhase::Failed
            } else {
                StorePhase::Ready
            };
            self.set_phase(restored).await;
            self.emitter.emit_error("update_inventory", &e);
            return Err(e);
        }

        info!(
            %warehouse_id,
            product = %update.product_name(),
            quantity = update.quantity(),
            "Inventory updated, reconciling"
        );
        self.load_all().await
    }

    async fn prepare_update(
        &self,
        warehouse_id: WarehouseId,
        product_name: &str,
        quantity_raw: &str,
    ) -> ClientResult<InventoryUpdate> {
        if !self.state.read().await.warehouses.contains(warehouse_id) {
            return Err(ValidationError::UnknownWarehouse(warehouse_id).into());
        }

        Ok(InventoryUpdate::parse(warehouse_id, product_name, quantity_raw)?)
    }

    /// Submits an order; the backend picks the fulfilling warehouse.
    ///
    /// Both fields are checked locally first. The cached set is not reloaded.
    pub async fn place_order(
        &self,
        address: &str,
        product_id: &str,
    ) -> ClientResult<OrderConfirmation> {
        let result = match OrderRequest::new(address, product_id) {
            Ok(order) => self.gateway.submit_order(&order).await,
            Err(e) => Err(e.into()),
        };

        match &result {
            Ok(confirmation) => {
                info!(warehouse = %confirmation.warehouse_name, "Order placed");
            }
            Err(e) => {
                warn!(error = %e, "Order failed");
                self.emitter.emit_error("place_order", e);
            }
        }

        result
    }

    // =========================================================================
    // Phase Helpers
    // =========================================================================

    async fn set_phase(&self, phase: StorePhase) {
        self.replace_phase(phase).await;
    }

    /// Sets the phase and returns the one it replaced.
    async fn replace_phase(&self, phase: StorePhase) -> StorePhase {
        let previous = {
            let mut state = self.state.write().await;
            std::mem::replace(&mut state.phase, phase)
        };

        if previous != phase {
            debug!(from = %previous, to = %phase, "Store phase changed");
            self.emitter.emit_phase(phase);
        }

        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{demo_warehouses, InMemoryGateway};
    use depot_core::InventoryItem;
    use std::time::Duration;

    /// Records everything the store emits.
    #[derive(Default)]
    struct RecordingEmitter {
        phases: std::sync::Mutex<Vec<StorePhase>>,
        refreshes: std::sync::Mutex<Vec<usize>>,
        errors: std::sync::Mutex<Vec<String>>,
    }

    impl StoreEventEmitter for RecordingEmitter {
        fn emit_phase(&self, phase: StorePhase) {
            self.phases.lock().unwrap().push(phase);
        }

        fn emit_refreshed(&self, count: usize) {
            self.refreshes.lock().unwrap().push(count);
        }

        fn emit_error(&self, operation: &str, _error: &ClientError) {
            self.errors.lock().unwrap().push(operation.to_string());
        }
    }

    fn warehouse(id: i64, name: &str, lat: f64, lon: f64, items: &[(&str, u32)]) -> Warehouse {
        Warehouse {
            id: WarehouseId(id),
            name: name.to_string(),
            location: String::new(),
            coordinate: Coordinate::new(lat, lon).unwrap(),
            delivery_time_hours: 24.0,
            inventories: items
                .iter()
                .enumerate()
                .map(|(i, (product, quantity))| InventoryItem {
                    id: id * 100 + i as i64,
                    product_name: product.to_string(),
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    fn store_with(
        warehouses: Vec<Warehouse>,
    ) -> (
        InventoryStore<Arc<InMemoryGateway>>,
        Arc<InMemoryGateway>,
        Arc<RecordingEmitter>,
    ) {
        let gateway = Arc::new(InMemoryGateway::new(warehouses));
        let emitter = Arc::new(RecordingEmitter::default());
        let store = InventoryStore::with_emitter(gateway.clone(), emitter.clone());
        (store, gateway, emitter)
    }

    async fn loaded_demo_store() -> (
        InventoryStore<Arc<InMemoryGateway>>,
        Arc<InMemoryGateway>,
        Arc<RecordingEmitter>,
    ) {
        let (store, gateway, emitter) = store_with(demo_warehouses());
        store.load_all().await.unwrap();
        (store, gateway, emitter)
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_new_store_is_uninitialized_and_idle() {
        let (store, gateway, _) = store_with(demo_warehouses());

        assert_eq!(store.phase().await, StorePhase::Uninitialized);
        assert!(store.warehouses().await.is_empty());
        assert_eq!(gateway.fetch_calls(), 0);
    }

    #[tokio::test]
    async fn test_load_all_success() {
        let (store, _, emitter) = loaded_demo_store().await;

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.phase, StorePhase::Ready);
        assert_eq!(snapshot.warehouses.len(), 3);
        assert!(snapshot.last_error.is_none());
        assert!(snapshot.refreshed_at.is_some());

        assert_eq!(
            *emitter.phases.lock().unwrap(),
            vec![StorePhase::Loading, StorePhase::Ready]
        );
        assert_eq!(*emitter.refreshes.lock().unwrap(), vec![3]);
    }

    #[tokio::test]
    async fn test_load_failure_then_retry() {
        let (store, gateway, emitter) = loaded_demo_store().await;

        gateway
            .fail_next_fetch(ClientError::Network("connection refused".into()))
            .await;
        let err = store.load_all().await.unwrap_err();
        assert!(err.is_network());

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.phase, StorePhase::Failed);
        assert_eq!(snapshot.last_error, Some(err));
        assert_eq!(snapshot.warehouses.len(), 3, "previous set is kept");
        assert_eq!(*emitter.errors.lock().unwrap(), vec!["load".to_string()]);

        store.load_all().await.unwrap();
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.phase, StorePhase::Ready);
        assert!(snapshot.last_error.is_none());
    }

    #[tokio::test]
    async fn test_first_load_failure_leaves_empty_set() {
        let (store, gateway, _) = store_with(demo_warehouses());
        gateway
            .fail_next_fetch(ClientError::Timeout("10s".into()))
            .await;

        assert!(store.load_all().await.is_err());
        assert_eq!(store.phase().await, StorePhase::Failed);
        assert!(store.warehouses().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_replaces_instead_of_merging() {
        let (store, gateway, _) = loaded_demo_store().await;

        gateway
            .replace_all(vec![warehouse(9, "Only One", 0.0, 0.0, &[])])
            .await;
        store.load_all().await.unwrap();

        let ids: Vec<i64> = store.warehouses().await.iter().map(|w| w.id.0).collect();
        assert_eq!(ids, vec![9]);
    }

    #[tokio::test]
    async fn test_duplicate_ids_fail_the_load() {
        let (store, _, _) = store_with(vec![
            warehouse(1, "A", 0.0, 0.0, &[]),
            warehouse(1, "B", 1.0, 1.0, &[]),
        ]);

        let err = store.load_all().await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidPayload(_)));
        assert_eq!(store.phase().await, StorePhase::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_loads_coalesce() {
        let gateway =
            Arc::new(InMemoryGateway::new(demo_warehouses()).with_latency(Duration::from_millis(50)));
        let store = InventoryStore::new(gateway.clone());

        let (a, b, c, d, e) = tokio::join!(
            store.load_all(),
            store.load_all(),
            store.load_all(),
            store.load_all(),
            store.load_all(),
        );

        for result in [a, b, c, d, e] {
            assert!(result.is_ok());
        }
        // first caller's fetch, then one shared follow-up for the rest
        assert_eq!(gateway.fetch_calls(), 2);
        assert_eq!(store.phase().await, StorePhase::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_coalesced_callers_share_failure() {
        let gateway =
            Arc::new(InMemoryGateway::new(demo_warehouses()).with_latency(Duration::from_millis(50)));
        let store = InventoryStore::new(gateway.clone());

        // `a` fetches alone; `b` and `c` queue behind it and share one follow-up
        gateway.fail_next_fetch(ClientError::Network("a".into())).await;
        gateway.fail_next_fetch(ClientError::Network("b".into())).await;
        let (a, b, c) = tokio::join!(store.load_all(), store.load_all(), store.load_all());

        assert_eq!(a, Err(ClientError::Network("a".into())));
        assert_eq!(b, Err(ClientError::Network("b".into())));
        assert_eq!(c, Err(ClientError::Network("b".into())));
        assert_eq!(gateway.fetch_calls(), 2);
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_search_and_view() {
        let (store, _, _) = store_with(vec![
            warehouse(1, "Warehouse A", 0.0, 0.0, &[("Widget", 0), ("Gadget", 2)]),
            warehouse(2, "Store B", 1.0, 1.0, &[("Widget", 5)]),
        ]);
        store.load_all().await.unwrap();

        let all = store.search("").await;
        assert_eq!(all.len(), 2);

        let hits = store.search("ware").await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Warehouse A");

        let view = store.view("WARE", true).await;
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].inventories.len(), 1);
        assert_eq!(view[0].inventories[0].product_name, "Gadget");

        assert!(store.search(&"x".repeat(101)).await.is_empty());
        assert!(store.view(&"ware".repeat(50), false).await.is_empty());
    }

    #[test]
    fn test_filter_stocked_passthrough() {
        let list = vec![warehouse(1, "A", 0.0, 0.0, &[("Widget", 0)])];
        let unchanged = InventoryStore::<InMemoryGateway>::filter_stocked(&list, false);
        assert_eq!(unchanged, list);

        let stocked = InventoryStore::<InMemoryGateway>::filter_stocked(&list, true);
        assert_eq!(stocked.len(), 1);
        assert!(stocked[0].inventories.is_empty());
    }

    #[tokio::test]
    async fn test_optimal_warehouse_beijing_scenario() {
        let (store, _, _) = store_with(vec![
            warehouse(1, "Beijing", 39.90, 116.40, &[]),
            warehouse(2, "Shanghai", 31.23, 121.47, &[]),
        ]);
        store.load_all().await.unwrap();

        let best = store
            .optimal_warehouse(Coordinate::new(39.90, 116.40).unwrap())
            .await
            .unwrap();
        assert_eq!(best.warehouse.id, WarehouseId(1));
        assert!(best.distance_km.abs() < 1e-6);

        let ranked = store
            .rank_by_distance(Coordinate::new(31.0, 121.0).unwrap())
            .await;
        let ids: Vec<i64> = ranked.iter().map(|r| r.warehouse.id.0).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_optimal_warehouse_empty_is_not_found() {
        let (store, _, _) = store_with(vec![]);
        let query = Coordinate::new(0.0, 0.0).unwrap();

        assert!(store.optimal_warehouse(query).await.unwrap_err().is_not_found());

        store.load_all().await.unwrap();
        assert!(store.optimal_warehouse(query).await.unwrap_err().is_not_found());
    }

    // -------------------------------------------------------------------------
    // Inventory Updates
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_update_validation_makes_no_gateway_calls() {
        let (store, gateway, emitter) = loaded_demo_store().await;
        let fetches_before = gateway.fetch_calls();

        for (name, quantity) in [("Widget", "-1"), ("Widget", ""), ("Widget", "ten"), ("", "3"), ("  ", "3")] {
            let err = store
                .update_inventory(WarehouseId(1), name, quantity)
                .await
                .unwrap_err();
            assert!(err.is_validation(), "{:?}/{:?} gave {:?}", name, quantity, err);
        }

        assert_eq!(gateway.update_calls(), 0);
        assert_eq!(gateway.fetch_calls(), fetches_before);
        assert_eq!(store.phase().await, StorePhase::Ready);
        assert_eq!(emitter.errors.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_update_unknown_warehouse_is_validation_error() {
        let (store, gateway, _) = loaded_demo_store().await;

        let err = store
            .update_inventory(WarehouseId(404), "Widget", "1")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ClientError::Validation(ValidationError::UnknownWarehouse(WarehouseId(404)))
        );
        assert!(err.is_validation());
        assert!(!err.is_not_found());
        assert_eq!(gateway.update_calls(), 0);
        assert_eq!(store.phase().await, StorePhase::Ready);
    }

    #[tokio::test]
    async fn test_update_success_reloads_exactly_once() {
        let (store, gateway, emitter) = loaded_demo_store().await;
        assert_eq!(gateway.fetch_calls(), 1);

        store
            .update_inventory(WarehouseId(2), " Widget ", " 99 ")
            .await
            .unwrap();

        assert_eq!(gateway.update_calls(), 1);
        assert_eq!(gateway.fetch_calls(), 2);

        let set = store.warehouses().await;
        let shanghai = set.get(WarehouseId(2)).unwrap();
        assert_eq!(shanghai.item("Widget").map(|i| i.quantity), Some(99));

        let phases = emitter.phases.lock().unwrap().clone();
        assert_eq!(
            phases,
            vec![
                StorePhase::Loading,
                StorePhase::Ready,
                StorePhase::Updating,
                StorePhase::Loading,
                StorePhase::Ready,
            ]
        );
    }

    #[tokio::test]
    async fn test_update_zero_quantity_is_allowed() {
        let (store, gateway, _) = loaded_demo_store().await;

        store
            .update_inventory(WarehouseId(1), "Widget", "0")
            .await
            .unwrap();

        let set = store.warehouses().await;
        assert_eq!(
            set.get(WarehouseId(1)).and_then(|w| w.item("Widget")).map(|i| i.quantity),
            Some(0)
        );
        assert_eq!(gateway.fetch_calls(), 2);
    }

    #[tokio::test]
    async fn test_update_gateway_failure_leaves_set_untouched() {
        let (store, gateway, _) = loaded_demo_store().await;
        let before = store.warehouses().await;

        gateway
            .fail_next_update(ClientError::Rejected("quantity too large".into()))
            .await;
        let err = store
            .update_inventory(WarehouseId(1), "Widget", "5")
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Rejected(_)));
        assert_eq!(store.warehouses().await, before);
        assert_eq!(store.phase().await, StorePhase::Ready);
        assert_eq!(gateway.fetch_calls(), 1, "no reload after a failed update");
    }

    #[tokio::test]
    async fn test_update_then_reload_failure() {
        let (store, gateway, _) = loaded_demo_store().await;

        gateway
            .fail_next_fetch(ClientError::Http {
                status: 502,
                message: "bad gateway".into(),
            })
            .await;
        let err = store
            .update_inventory(WarehouseId(1), "Widget", "5")
            .await
            .unwrap_err();

        assert!(err.is_network());
        assert_eq!(gateway.update_calls(), 1);
        assert_eq!(store.phase().await, StorePhase::Failed);

        // retry recovers and shows the applied update
        store.load_all().await.unwrap();
        let set = store.warehouses().await;
        assert_eq!(
            set.get(WarehouseId(1)).and_then(|w| w.item("Widget")).map(|i| i.quantity),
            Some(5)
        );
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_place_order() {
        let (store, gateway, emitter) = loaded_demo_store().await;

        let conf = store.place_order("Chaoyang, Beijing", "Widget").await.unwrap();
        assert_eq!(conf.warehouse_name, "Beijing Hub");
        assert_eq!(gateway.fetch_calls(), 1, "orders do not reload");

        let err = store.place_order("", "Widget").await.unwrap_err();
        assert!(err.is_validation());
        let err = store.place_order("Somewhere", " ").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(gateway.order_calls(), 1);

        assert_eq!(
            *emitter.errors.lock().unwrap(),
            vec!["place_order".to_string(), "place_order".to_string()]
        );
    }

    #[tokio::test]
    async fn test_place_order_gateway_failure_is_surfaced() {
        let (store, gateway, emitter) = loaded_demo_store().await;

        gateway
            .fail_next_order(ClientError::Network("backend down".into()))
            .await;
        let err = store.place_order("Pudong, Shanghai", "Gizmo").await.unwrap_err();

        assert_eq!(err, ClientError::Network("backend down".into()));
        assert_eq!(gateway.order_calls(), 1);
        assert_eq!(gateway.fetch_calls(), 1);
        assert_eq!(store.phase().await, StorePhase::Ready);
        assert_eq!(*emitter.errors.lock().unwrap(), vec!["place_order".to_string()]);

        // the injected failure is one-shot
        let conf = store.place_order("Pudong, Shanghai", "Gizmo").await.unwrap();
        assert_eq!(conf.warehouse_name, "Shanghai Hub");
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(StorePhase::Uninitialized.to_string(), "uninitialized");
        assert_eq!(StorePhase::Updating.to_string(), "updating");
        assert_eq!(StorePhase::default(), StorePhase::Uninitialized);
    }
}
