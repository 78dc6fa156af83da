//! # HTTP Gateway
//!
//! [`WarehouseGateway`] over the warehouse backend's JSON API.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         HttpGateway                                     │
//! │                                                                         │
//! │  fetch_all ──► GET  ──┬── 2xx ──► decode DTOs ──► TryFrom ──► Ok        │
//! │      ▲                │                                                 │
//! │      │ backoff        ├── retryable (transport, timeout, 5xx, 429)      │
//! │      └────────────────┘         while attempts < max_retries            │
//! │                                                                         │
//! │  update_inventory ──► POST (query string) ──► single attempt            │
//! │  submit_order     ──► POST (JSON body)    ──► single attempt            │
//! │                                                                         │
//! │  Status mapping:  400/422 ──► Rejected                                  │
//! │                   404     ──► NotFound                                  │
//! │                   other   ──► Http { status, message }                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every request carries a fresh `x-request-id` (UUID v4), recorded on the
//! surrounding tracing span so client and server logs can be joined.

use async_trait::async_trait;
use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use depot_core::{InventoryUpdate, OrderConfirmation, OrderRequest, Warehouse};
use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, field, info, instrument, warn, Span};
use url::Url;
use uuid::Uuid;

use crate::config::{ClientConfig, RetrySettings};
use crate::error::{ClientError, ClientResult};
use crate::gateway::WarehouseGateway;
use crate::protocol::{
    decode_warehouses, inventory_path, InventoryQuery, WarehouseDto, ORDERS_PATH, WAREHOUSES_PATH,
};

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Gateway backed by the warehouse HTTP API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: Url,
    retry: RetrySettings,
}

impl HttpGateway {
    /// Builds a gateway from validated configuration.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(concat!("depot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut base_url = config.base_url()?;
        // Url::join drops the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        info!(base_url = %base_url, "HTTP gateway ready");

        Ok(HttpGateway {
            client,
            base_url,
            retry: config.retry.clone(),
        })
    }

    /// The normalized base URL (always ends in `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Tags the request with a new id and sends it.
    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let request_id = Uuid::new_v4();
        Span::current().record("request_id", field::display(request_id));

        let started = Instant::now();
        let response = request
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await?;

        debug!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Response received"
        );

        check_status(response).await
    }

    /// One GET of the warehouse list, no retries.
    #[instrument(skip(self), fields(request_id = field::Empty))]
    async fn fetch_once(&self) -> ClientResult<Vec<Warehouse>> {
        let url = self.endpoint(WAREHOUSES_PATH)?;
        let response = self.send(self.client.get(url)).await?;

        let dtos: Vec<WarehouseDto> = response.json().await?;
        let set = decode_warehouses(dtos)?;

        debug!(count = set.len(), "Warehouses decoded");
        Ok(set.into_vec())
    }

    /// Creates the exponential backoff configuration.
    fn create_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(self.retry.initial_backoff_ms))
            .with_max_interval(Duration::from_secs(self.retry.max_backoff_secs))
            .with_multiplier(2.0)
            .with_max_elapsed_time(None)
            .build()
    }
}

/// Maps non-success statuses onto the error taxonomy.
async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body
    };

    Err(match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ClientError::Rejected(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        other => ClientError::Http {
            status: other.as_u16(),
            message,
        },
    })
}

#[async_trait]
impl WarehouseGateway for HttpGateway {
    async fn fetch_all(&self) -> ClientResult<Vec<Warehouse>> {
        let mut backoff = self.create_backoff();
        let mut attempt: u32 = 0;

        loop {
            match self.fetch_once().await {
                Ok(warehouses) => return Ok(warehouses),
                Err(e) if e.is_retryable() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let Some(delay) = backoff.next_backoff() else {
                        return Err(e);
                    };
                    warn!(
                        error = %e,
                        attempt,
                        max_retries = self.retry.max_retries,
                        ?delay,
                        "Fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    #[instrument(
        skip(self, update),
        fields(
            warehouse_id = %update.warehouse_id(),
            product = %update.product_name(),
            quantity = update.quantity(),
            request_id = field::Empty,
        )
    )]
    async fn update_inventory(&self, update: &InventoryUpdate) -> ClientResult<()> {
        let url = self.endpoint(&inventory_path(update.warehouse_id()))?;
        let request = self.client.post(url).query(&InventoryQuery::from(update));

        let response = self.send(request).await?;
        match response.text().await {
            Ok(body) => debug!(body = %body, "Inventory updated"),
            Err(e) => debug!(error = %e, "Inventory updated, response body unreadable"),
        }

        Ok(())
    }

    #[instrument(skip(self, order), fields(product_id = %order.product_id(), request_id = field::Empty))]
    async fn submit_order(&self, order: &OrderRequest) -> ClientResult<OrderConfirmation> {
        let url = self.endpoint(ORDERS_PATH)?;
        let response = self.send(self.client.post(url).json(order)).await?;

        let confirmation: OrderConfirmation = response.json().await?;
        info!(warehouse = %confirmation.warehouse_name, "Order routed");
        Ok(confirmation)
    }
}
