//! # Warehouse Gateway
//!
//! The store's only door to the backend. Two implementations ship with the
//! crate: [`HttpGateway`](crate::http::HttpGateway) for the real service and
//! [`InMemoryGateway`](crate::memory::InMemoryGateway) for tests and demos.

use async_trait::async_trait;
use depot_core::{InventoryUpdate, OrderConfirmation, OrderRequest, Warehouse};

use crate::error::ClientResult;

/// Remote operations on the warehouse backend.
///
/// ## Contract
/// - `fetch_all` returns the complete list in server order; partial results
///   are never returned.
/// - `update_inventory` sets (not adjusts) the product's quantity. Callers
///   have already validated the command.
/// - `submit_order` lets the backend choose the fulfilling warehouse.
#[async_trait]
pub trait WarehouseGateway: Send + Sync {
    async fn fetch_all(&self) -> ClientResult<Vec<Warehouse>>;

    async fn update_inventory(&self, update: &InventoryUpdate) -> ClientResult<()>;

    async fn submit_order(&self, order: &OrderRequest) -> ClientResult<OrderConfirmation>;
}

#[async_trait]
impl<G> WarehouseGateway for std::sync::Arc<G>
where
    G: WarehouseGateway + ?Sized,
{
    async fn fetch_all(&self) -> ClientResult<Vec<Warehouse>> {
        (**self).fetch_all().await
    }

    async fn update_inventory(&self, update: &InventoryUpdate) -> ClientResult<()> {
        (**self).update_inventory(update).await
    }

    async fn submit_order(&self, order: &OrderRequest) -> ClientResult<OrderConfirmation> {
        (**self).submit_order(order).await
    }
}
