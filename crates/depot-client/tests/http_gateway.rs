//! End-to-end tests of `HttpGateway` and `InventoryStore` against a fake
//! warehouse backend served by axum on an ephemeral port.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use depot_client::protocol::{InventoryItemDto, InventoryQuery, WarehouseDto};
use depot_client::{ClientConfig, ClientError, HttpGateway, InventoryStore, StorePhase, WarehouseGateway};
use depot_core::{Coordinate, InventoryUpdate, WarehouseId};

// =============================================================================
// Fake Backend
// =============================================================================

#[derive(Default)]
struct FakeBackend {
    warehouses: Mutex<Vec<WarehouseDto>>,
    fetches: AtomicUsize,
    updates: AtomicUsize,
    /// Number of upcoming fetches answered with 503.
    failing_fetches: AtomicUsize,
    request_ids: Mutex<Vec<String>>,
}

impl FakeBackend {
    fn record_request_id(&self, headers: &HeaderMap) {
        let id = headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.request_ids.lock().unwrap().push(id);
    }
}

async fn list_warehouses(State(backend): State<Arc<FakeBackend>>, headers: HeaderMap) -> Response {
    backend.record_request_id(&headers);
    backend.fetches.fetch_add(1, Ordering::SeqCst);

    let failing = backend.failing_fetches.load(Ordering::SeqCst);
    if failing > 0 {
        backend.failing_fetches.store(failing - 1, Ordering::SeqCst);
        return (StatusCode::SERVICE_UNAVAILABLE, "warming up").into_response();
    }

    let list = backend.warehouses.lock().unwrap().clone();
    Json(list).into_response()
}

async fn update_inventory(
    State(backend): State<Arc<FakeBackend>>,
    Path(id): Path<i64>,
    Query(query): Query<InventoryQuery>,
    headers: HeaderMap,
) -> Response {
    backend.record_request_id(&headers);
    backend.updates.fetch_add(1, Ordering::SeqCst);

    if query.quantity > 10_000 {
        return (StatusCode::UNPROCESSABLE_ENTITY, "quantity exceeds capacity").into_response();
    }

    let mut warehouses = backend.warehouses.lock().unwrap();
    let Some(warehouse) = warehouses.iter_mut().find(|w| w.id == id) else {
        return (StatusCode::NOT_FOUND, format!("warehouse {} not found", id)).into_response();
    };

    match warehouse
        .inventories
        .iter_mut()
        .find(|i| i.product_name == query.product_name)
    {
        Some(item) => item.quantity = i64::from(query.quantity),
        None => warehouse.inventories.push(InventoryItemDto {
            id: 1000,
            product_name: query.product_name.clone(),
            quantity: i64::from(query.quantity),
        }),
    }

    Json(json!({"status": "ok"})).into_response()
}

async fn place_order(
    State(backend): State<Arc<FakeBackend>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    backend.record_request_id(&headers);

    let product = body["productId"].as_str().unwrap_or_default().to_string();
    let warehouses = backend.warehouses.lock().unwrap();
    match warehouses.iter().find(|w| {
        w.inventories
            .iter()
            .any(|i| i.product_name == product && i.quantity > 0)
    }) {
        Some(w) => Json(json!({"warehouseName": w.name})).into_response(),
        None => (StatusCode::BAD_REQUEST, "out of stock").into_response(),
    }
}

struct TestServer {
    base_url: String,
    backend: Arc<FakeBackend>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(warehouses: Vec<WarehouseDto>) -> Self {
        let backend = Arc::new(FakeBackend {
            warehouses: Mutex::new(warehouses),
            ..Default::default()
        });

        let app = Router::new()
            .route("/api/warehouses", get(list_warehouses))
            .route("/api/warehouses/{id}/inventory", post(update_inventory))
            .route("/api/orders", post(place_order))
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer {
            base_url: format!("http://{}", addr),
            backend,
            handle,
        }
    }

    fn config(&self, max_retries: u32) -> ClientConfig {
        let mut config = ClientConfig::default();
        config.api.base_url = self.base_url.clone();
        config.api.timeout_secs = 5;
        config.retry.max_retries = max_retries;
        config.retry.initial_backoff_ms = 10;
        config.retry.max_backoff_secs = 1;
        config
    }

    fn gateway(&self, max_retries: u32) -> HttpGateway {
        HttpGateway::new(&self.config(max_retries)).unwrap()
    }

    fn fetches(&self) -> usize {
        self.backend.fetches.load(Ordering::SeqCst)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn dto(id: i64, name: &str, lat: f64, lon: f64, items: &[(&str, i64)]) -> WarehouseDto {
    WarehouseDto {
        id,
        name: name.to_string(),
        location: format!("{} district", name),
        latitude: lat,
        longitude: lon,
        delivery_time: 24.0,
        inventories: items
            .iter()
            .enumerate()
            .map(|(i, (product, quantity))| InventoryItemDto {
                id: id * 10 + i as i64,
                product_name: product.to_string(),
                quantity: *quantity,
            })
            .collect(),
    }
}

fn network() -> Vec<WarehouseDto> {
    vec![
        dto(1, "Beijing Hub", 39.90, 116.40, &[("Widget", 5), ("Gadget", 0)]),
        dto(2, "Shanghai Hub", 31.23, 121.47, &[("Gadget", 8)]),
    ]
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_load_update_and_reconcile() {
    let server = TestServer::spawn(network()).await;
    let store = InventoryStore::new(server.gateway(0));

    store.load_all().await.unwrap();
    assert_eq!(store.phase().await, StorePhase::Ready);
    assert_eq!(store.warehouses().await.len(), 2);
    assert_eq!(server.fetches(), 1);

    store
        .update_inventory(WarehouseId(2), "Widget", "14")
        .await
        .unwrap();

    assert_eq!(server.backend.updates.load(Ordering::SeqCst), 1);
    assert_eq!(server.fetches(), 2, "exactly one reconciling fetch");

    let set = store.warehouses().await;
    let shanghai = set.get(WarehouseId(2)).unwrap();
    assert_eq!(shanghai.item("Widget").map(|i| i.quantity), Some(14));

    let best = store
        .optimal_warehouse(Coordinate::new(31.0, 121.0).unwrap())
        .await
        .unwrap();
    assert_eq!(best.warehouse.name, "Shanghai Hub");
}

#[tokio::test]
async fn test_every_request_carries_a_fresh_request_id() {
    let server = TestServer::spawn(network()).await;
    let store = InventoryStore::new(server.gateway(0));

    store.load_all().await.unwrap();
    store
        .update_inventory(WarehouseId(1), "Widget", "3")
        .await
        .unwrap();
    store.place_order("1 Main St", "Widget").await.unwrap();

    let ids = server.backend.request_ids.lock().unwrap().clone();
    assert_eq!(ids.len(), 4);
    for id in &ids {
        assert!(uuid::Uuid::parse_str(id).is_ok(), "bad request id {:?}", id);
    }
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
}

#[tokio::test]
async fn test_fetch_retries_transient_failures() {
    let server = TestServer::spawn(network()).await;
    server.backend.failing_fetches.store(2, Ordering::SeqCst);

    let warehouses = server.gateway(3).fetch_all().await.unwrap();
    assert_eq!(warehouses.len(), 2);
    assert_eq!(server.fetches(), 3);
}

#[tokio::test]
async fn test_fetch_gives_up_after_max_retries() {
    let server = TestServer::spawn(network()).await;
    server.backend.failing_fetches.store(10, Ordering::SeqCst);

    let store = InventoryStore::new(server.gateway(1));
    let err = store.load_all().await.unwrap_err();

    assert!(matches!(err, ClientError::Http { status: 503, .. }));
    assert!(err.is_network());
    assert_eq!(server.fetches(), 2);
    assert_eq!(store.phase().await, StorePhase::Failed);
}

#[tokio::test]
async fn test_backend_rejection_is_not_retried_and_skips_reload() {
    let server = TestServer::spawn(network()).await;
    let store = InventoryStore::new(server.gateway(3));
    store.load_all().await.unwrap();

    let err = store
        .update_inventory(WarehouseId(1), "Widget", "50000")
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Rejected(ref m) if m.contains("capacity")));
    assert!(err.is_validation());
    assert_eq!(server.backend.updates.load(Ordering::SeqCst), 1);
    assert_eq!(server.fetches(), 1);
    assert_eq!(store.phase().await, StorePhase::Ready);
}

#[tokio::test]
async fn test_unknown_warehouse_on_backend_is_not_found() {
    let server = TestServer::spawn(network()).await;
    let gateway = server.gateway(0);

    let update = InventoryUpdate::parse(WarehouseId(77), "Widget", "1").unwrap();
    let err = gateway.update_inventory(&update).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_negative_quantity_payload_fails_the_load() {
    let server = TestServer::spawn(vec![dto(1, "Broken", 0.0, 0.0, &[("Widget", -3)])]).await;
    let store = InventoryStore::new(server.gateway(3));

    let err = store.load_all().await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidPayload(_)));
    assert!(!err.is_retryable());
    assert_eq!(server.fetches(), 1);
    assert_eq!(store.phase().await, StorePhase::Failed);
}

#[tokio::test]
async fn test_place_order_round_trip() {
    let server = TestServer::spawn(network()).await;
    let store = InventoryStore::new(server.gateway(0));

    let conf = store.place_order("Pudong, Shanghai", "Gadget").await.unwrap();
    assert_eq!(conf.warehouse_name, "Shanghai Hub");

    let err = store.place_order("Pudong, Shanghai", "Sprocket").await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected(_)));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Grab a free port, then close it.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = ClientConfig::default();
    config.api.base_url = format!("http://{}", addr);
    config.retry.max_retries = 0;
    let gateway = HttpGateway::new(&config).unwrap();

    let err = gateway.fetch_all().await.unwrap_err();
    assert!(err.is_network(), "got {:?}", err);
    assert!(err.is_retryable());
}
