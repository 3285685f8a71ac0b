//! Order fetcher
//!
//! Loads an order together with everything its detail view needs. The
//! order itself must load; sketches, designs and products are fetched in
//! parallel afterwards and a failure on any of them is recorded in the
//! view instead of failing the whole load.

use futures::future::join_all;
use serde::de::DeserializeOwned;
use shared::models::{
    MaterialOrder, Product, RecordDesign, RecordSketch, ServiceOrder, record,
};
use shared::status::{OrderAction, OrderSection, ServiceOrderStatus};
use std::collections::HashMap;
use std::sync::Arc;

use crate::endpoints;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;

// ============================================================================
// Views
// ============================================================================

/// Kind of secondary resource that failed to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchedResource {
    Sketches,
    Designs,
    Product,
}

/// A secondary fetch that failed while the order itself loaded.
#[derive(Debug, Clone)]
pub struct FetchFailure {
    pub resource: FetchedResource,
    /// Order id for record lists, product id for products
    pub id: String,
    pub error: String,
}

/// Service order with its records and referenced products
#[derive(Debug, Clone)]
pub struct ServiceOrderView {
    pub order: ServiceOrder,
    pub sketches: Vec<RecordSketch>,
    pub designs: Vec<RecordDesign>,
    pub products: HashMap<String, Product>,
    pub failures: Vec<FetchFailure>,
}

impl ServiceOrderView {
    pub fn status(&self) -> ServiceOrderStatus {
        self.order.status
    }

    /// Whether every secondary fetch succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    /// Whether the list for `resource` loaded. A failed list is empty,
    /// so phase and selection checks on it would be wrong.
    pub fn records_loaded(&self, resource: FetchedResource) -> bool {
        !self.failures.iter().any(|f| f.resource == resource)
    }

    /// Fail unless the list for `resource` loaded.
    pub fn ensure_records_loaded(&self, resource: FetchedResource) -> ClientResult<()> {
        if self.records_loaded(resource) {
            return Ok(());
        }
        Err(ClientError::InvalidResponse(format!(
            "{resource:?} for order {} did not load",
            self.order.id
        )))
    }

    pub fn selected_sketch(&self) -> Option<&RecordSketch> {
        record::selected(&self.sketches)
    }

    pub fn selected_design(&self) -> Option<&RecordDesign> {
        record::selected(&self.designs)
    }

    pub fn sketch_phase(&self) -> u8 {
        record::current_phase(&self.sketches)
    }

    pub fn design_phase(&self) -> u8 {
        record::current_phase(&self.designs)
    }

    /// Sketches of the most recent phase.
    pub fn latest_sketches(&self) -> Vec<&RecordSketch> {
        record::latest(&self.sketches)
    }

    /// Designs of the most recent phase.
    pub fn latest_designs(&self) -> Vec<&RecordDesign> {
        record::latest(&self.designs)
    }

    /// Whether the customer may ask for another round of the records
    /// currently under review (sketches before the deposit, designs after).
    pub fn can_request_redraft(&self) -> bool {
        if self.status().deposit_paid() {
            self.records_loaded(FetchedResource::Designs) && record::can_redraft(&self.designs)
        } else {
            self.records_loaded(FetchedResource::Sketches) && record::can_redraft(&self.sketches)
        }
    }

    /// Actions shown for the order, minus redraft requests that the
    /// phase limit or an existing selection rules out. Sketch and design
    /// actions are hidden while their list failed to load.
    pub fn available_actions(&self) -> Vec<OrderAction> {
        let sketches = self.records_loaded(FetchedResource::Sketches);
        let designs = self.records_loaded(FetchedResource::Designs);
        self.status()
            .available_actions()
            .iter()
            .copied()
            .filter(|action| match action {
                OrderAction::RejectSketch => sketches && record::can_redraft(&self.sketches),
                OrderAction::RejectDesign => designs && record::can_redraft(&self.designs),
                OrderAction::ConfirmSketch => sketches && self.selected_sketch().is_none(),
                OrderAction::ConfirmDesign => designs && self.selected_design().is_none(),
                _ => true,
            })
            .collect()
    }

    /// Sum of catalog lines, priced from the loaded products when the
    /// line carries no price of its own.
    pub fn catalog_total(&self) -> f64 {
        shared::money::sum(self.order.service_order_details.iter().map(|line| {
            if line.total_price > 0.0 {
                line.total_price
            } else {
                let price = self.product(&line.product_id).map_or(line.price, |p| p.price);
                shared::money::line_total(price, line.quantity)
            }
        }))
    }
}

/// Material order with its referenced products
#[derive(Debug, Clone)]
pub struct MaterialOrderView {
    pub order: MaterialOrder,
    pub products: HashMap<String, Product>,
    pub failures: Vec<FetchFailure>,
}

impl MaterialOrderView {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }
}

// ============================================================================
// Fetcher
// ============================================================================

/// Order loader
pub struct OrderFetcher<C: HttpClient> {
    http: Arc<C>,
}

impl<C: HttpClient> Clone for OrderFetcher<C> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
        }
    }
}

impl<C: HttpClient> OrderFetcher<C> {
    pub fn new(http: Arc<C>) -> Self {
        Self { http }
    }

    /// Load a service order with the records its status shows and every
    /// referenced product.
    pub async fn service_order(&self, id: &str) -> ClientResult<ServiceOrderView> {
        let order: ServiceOrder = self.http.get(&endpoints::service_order(id)).await?;
        let status = order.status;
        tracing::debug!(order_id = %id, status = %status, "Service order loaded");

        let sketches = async {
            if status.shows(OrderSection::Sketches) {
                Some(self.list::<RecordSketch>(&endpoints::sketches(id)).await)
            } else {
                None
            }
        };
        let designs = async {
            if status.shows(OrderSection::Designs) {
                Some(self.list::<RecordDesign>(&endpoints::designs(id)).await)
            } else {
                None
            }
        };
        let product_ids = order.product_ids();
        let products = self.products(&product_ids);
        let (sketches, designs, (products, mut failures)) =
            tokio::join!(sketches, designs, products);

        let sketches = collect_records(sketches, FetchedResource::Sketches, id, &mut failures);
        let designs = collect_records(designs, FetchedResource::Designs, id, &mut failures);

        if !failures.is_empty() {
            tracing::warn!(order_id = %id, failed = failures.len(), "Service order loaded partially");
        }
        Ok(ServiceOrderView {
            order,
            sketches,
            designs,
            products,
            failures,
        })
    }

    /// Load a material order with its products.
    pub async fn material_order(&self, id: &str) -> ClientResult<MaterialOrderView> {
        let order: MaterialOrder = self.http.get(&endpoints::material_order(id)).await?;
        let (products, failures) = self.products(&order.product_ids()).await;
        if !failures.is_empty() {
            tracing::warn!(order_id = %id, failed = failures.len(), "Material order loaded partially");
        }
        Ok(MaterialOrderView {
            order,
            products,
            failures,
        })
    }

    pub async fn service_orders_for_user(&self, user_id: &str) -> ClientResult<Vec<ServiceOrder>> {
        self.list(&endpoints::service_orders_for_user(user_id)).await
    }

    pub async fn material_orders_for_user(
        &self,
        user_id: &str,
    ) -> ClientResult<Vec<MaterialOrder>> {
        self.list(&endpoints::material_orders_for_user(user_id)).await
    }

    /// The backend answers 404 for an empty list (no orders yet, no
    /// phase drafted yet).
    async fn list<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<Vec<T>> {
        match self.http.get(path).await {
            Ok(items) => Ok(items),
            Err(ClientError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn products(&self, ids: &[&str]) -> (HashMap<String, Product>, Vec<FetchFailure>) {
        let results = join_all(ids.iter().map(|id| async move {
            let result: ClientResult<Product> = self.http.get(&endpoints::product(id)).await;
            (*id, result)
        }))
        .await;

        let mut products = HashMap::with_capacity(results.len());
        let mut failures = Vec::new();
        for (id, result) in results {
            match result {
                Ok(product) => {
                    products.insert(id.to_string(), product);
                }
                Err(e) => {
                    tracing::warn!(product_id = %id, error = %e, "Product fetch failed");
                    failures.push(FetchFailure {
                        resource: FetchedResource::Product,
                        id: id.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }
        (products, failures)
    }
}

fn collect_records<T>(
    result: Option<ClientResult<Vec<T>>>,
    resource: FetchedResource,
    order_id: &str,
    failures: &mut Vec<FetchFailure>,
) -> Vec<T> {
    match result {
        Some(Ok(records)) => records,
        Some(Err(e)) => {
            tracing::warn!(order_id, ?resource, error = %e, "Record fetch failed");
            failures.push(FetchFailure {
                resource,
                id: order_id.to_string(),
                error: e.to_string(),
            });
            Vec::new()
        }
        None => Vec::new(),
    }
}
