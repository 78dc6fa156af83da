//! # In-Memory Gateway
//!
//! A [`WarehouseGateway`] backed by a local list. Used as the store's test
//! double and by the shell's `--demo` mode.
//!
//! ## Test Hooks
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fetch_calls / update_calls / order_calls   call counters               │
//! │  fail_next_fetch / _update / _order(err)    one-shot failure injection  │
//! │  with_latency(d)                            delay every call by d       │
//! │  replace_all(list)                          server-side data change     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use depot_core::{
    Coordinate, InventoryItem, InventoryUpdate, OrderConfirmation, OrderRequest, Warehouse,
    WarehouseId,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::gateway::WarehouseGateway;

/// Pending one-shot failures per operation.
#[derive(Default)]
struct Failures {
    fetch: VecDeque<ClientError>,
    update: VecDeque<ClientError>,
    order: VecDeque<ClientError>,
}

/// Gateway over an in-process warehouse list.
pub struct InMemoryGateway {
    warehouses: Mutex<Vec<Warehouse>>,
    failures: Mutex<Failures>,
    latency: Option<Duration>,
    fetch_calls: AtomicUsize,
    update_calls: AtomicUsize,
    order_calls: AtomicUsize,
}

impl InMemoryGateway {
    /// Creates a gateway serving `warehouses` in the given order.
    pub fn new(warehouses: Vec<Warehouse>) -> Self {
        InMemoryGateway {
            warehouses: Mutex::new(warehouses),
            failures: Mutex::new(Failures::default()),
            latency: None,
            fetch_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            order_calls: AtomicUsize::new(0),
        }
    }

    /// Delays every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of `fetch_all` calls so far, including failed ones.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Number of `update_inventory` calls so far.
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Number of `submit_order` calls so far.
    pub fn order_calls(&self) -> usize {
        self.order_calls.load(Ordering::SeqCst)
    }

    /// The next `fetch_all` fails with `err`.
    pub async fn fail_next_fetch(&self, err: ClientError) {
        self.failures.lock().await.fetch.push_back(err);
    }

    /// The next `update_inventory` fails with `err` without applying.
    pub async fn fail_next_update(&self, err: ClientError) {
        self.failures.lock().await.update.push_back(err);
    }

    /// The next `submit_order` fails with `err`.
    pub async fn fail_next_order(&self, err: ClientError) {
        self.failures.lock().await.order.push_back(err);
    }

    /// Replaces the served list, as if another client changed the backend.
    pub async fn replace_all(&self, warehouses: Vec<Warehouse>) {
        *self.warehouses.lock().await = warehouses;
    }

    /// Current server-side list.
    pub async fn warehouses(&self) -> Vec<Warehouse> {
        self.warehouses.lock().await.clone()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl WarehouseGateway for InMemoryGateway {
    async fn fetch_all(&self) -> ClientResult<Vec<Warehouse>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if let Some(err) = self.failures.lock().await.fetch.pop_front() {
            return Err(err);
        }

        let warehouses = self.warehouses.lock().await.clone();
        debug!(count = warehouses.len(), "In-memory fetch");
        Ok(warehouses)
    }

    async fn update_inventory(&self, update: &InventoryUpdate) -> ClientResult<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if let Some(err) = self.failures.lock().await.update.pop_front() {
            return Err(err);
        }

        let mut warehouses = self.warehouses.lock().await;
        let next_item_id = warehouses
            .iter()
            .flat_map(|w| w.inventories.iter().map(|i| i.id))
            .max()
            .unwrap_or(0)
            + 1;

        let warehouse = warehouses
            .iter_mut()
            .find(|w| w.id == update.warehouse_id())
            .ok_or_else(|| {
                ClientError::NotFound(format!("warehouse {}", update.warehouse_id()))
            })?;

        match warehouse
            .inventories
            .iter_mut()
            .find(|i| i.product_name == update.product_name())
        {
            Some(item) => item.quantity = update.quantity(),
            None => warehouse.inventories.push(InventoryItem {
                id: next_item_id,
                product_name: update.product_name().to_string(),
                quantity: update.quantity(),
            }),
        }

        Ok(())
    }

    async fn submit_order(&self, order: &OrderRequest) -> ClientResult<OrderConfirmation> {
        self.order_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if let Some(err) = self.failures.lock().await.order.pop_front() {
            return Err(err);
        }

        let warehouses = self.warehouses.lock().await;
        warehouses
            .iter()
            .find(|w| {
                w.inventories.iter().any(|i| {
                    i.in_stock()
                        && (i.id.to_string() == order.product_id()
                            || i.product_name == order.product_id())
                })
            })
            .map(|w| OrderConfirmation {
                warehouse_name: w.name.clone(),
            })
            .ok_or_else(|| {
                ClientError::Rejected(format!("no warehouse stocks '{}'", order.product_id()))
            })
    }
}

// =============================================================================
// Demo Data
// =============================================================================

/// A small fixed warehouse network for demos and examples.
pub fn demo_warehouses() -> Vec<Warehouse> {
    let site = |id: i64, name: &str, location: &str, lat: f64, lon: f64, hours: f64| {
        Coordinate::new(lat, lon).map(|coordinate| Warehouse {
            id: WarehouseId(id),
            name: name.to_string(),
            location: location.to_string(),
            coordinate,
            delivery_time_hours: hours,
            inventories: Vec::new(),
        })
    };
    let item = |id: i64, name: &str, quantity: u32| InventoryItem {
        id,
        product_name: name.to_string(),
        quantity,
    };

    let mut warehouses: Vec<Warehouse> = [
        site(1, "Beijing Hub", "Chaoyang District, Beijing", 39.9042, 116.4074, 24.0),
        site(2, "Shanghai Hub", "Pudong, Shanghai", 31.2304, 121.4737, 36.0),
        site(3, "Guangzhou Depot", "Tianhe, Guangzhou", 23.1291, 113.2644, 48.0),
    ]
    .into_iter()
    .flatten()
    .collect();

    let stock = [
        vec![item(1, "Widget", 40), item(2, "Gadget", 0)],
        vec![item(3, "Widget", 12), item(4, "Gizmo", 7)],
        vec![item(5, "Gadget", 25)],
    ];
    for (warehouse, items) in warehouses.iter_mut().zip(stock) {
        warehouse.inventories = items;
    }

    warehouses
}
