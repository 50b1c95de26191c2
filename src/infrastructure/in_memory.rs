use crate::domain::order::{
    PendingRequest, PriceRating, PurchaseId, Rating, RequestId, SetListing,
};
use crate::domain::ports::StoreBackend;
use crate::domain::product::{ProductId, ProductKind};
use crate::domain::session::Role;
use crate::error::{Result, StoreError};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub name: String,
    pub theme: Option<String>,
    pub price: Decimal,
    pub quantity: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestStatus {
    Unfulfilled,
    Fulfilled,
}

#[derive(Debug, Clone)]
struct RequestRecord {
    product: ProductId,
    status: RequestStatus,
}

#[derive(Debug, Clone)]
struct PurchaseRecord {
    product: ProductId,
    customer: String,
    price: Decimal,
}

#[derive(Debug, Clone)]
struct ReviewRecord {
    rating: Rating,
    #[allow(dead_code)]
    text: String,
}

#[derive(Default)]
struct Inner {
    products: BTreeMap<ProductId, ProductRecord>,
    requests: BTreeMap<RequestId, RequestRecord>,
    purchases: BTreeMap<PurchaseId, PurchaseRecord>,
    reviews: BTreeMap<PurchaseId, ReviewRecord>,
    employees: HashMap<String, String>,
    customers: HashMap<String, String>,
    next_request: u64,
    next_purchase: u64,
}

/// In-memory store implementing the whole backend surface, including the
/// business rules the production stored procedures enforce.
///
/// Every operation takes one write or read lock for its full duration, so
/// check-and-act pairs (inventory before purchase, request status before
/// fulfillment, duplicate-review checks) are atomic here. Used by `--demo`
/// mode and by the test suites.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_employee(&self, username: &str, password: &str) {
        let mut inner = self.inner.write().await;
        inner
            .employees
            .insert(username.to_lowercase(), password.to_string());
    }

    pub async fn add_customer(&self, username: &str, password: &str) {
        let mut inner = self.inner.write().await;
        inner
            .customers
            .insert(username.to_lowercase(), password.to_string());
    }

    pub async fn add_product(&self, product: ProductId, record: ProductRecord) {
        let mut inner = self.inner.write().await;
        inner.products.insert(product, record);
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn member_exists(&self, role: Role, username: &str) -> Result<bool> {
        let inner = self.inner.read().await;
        let table = match role {
            Role::Employee => &inner.employees,
            Role::Customer => &inner.customers,
        };
        Ok(table.contains_key(username))
    }

    async fn check_credentials(&self, username: &str, password: &str) -> Result<bool> {
        let inner = self.inner.read().await;
        let stored = inner
            .employees
            .get(username)
            .or_else(|| inner.customers.get(username));
        Ok(stored.is_some_and(|p| p == password))
    }

    async fn pending_requests(&self) -> Result<Vec<PendingRequest>> {
        let inner = self.inner.read().await;
        Ok(inner
            .requests
            .iter()
            .filter(|(_, r)| r.status == RequestStatus::Unfulfilled)
            .map(|(&request, r)| PendingRequest {
                request,
                product: r.product,
            })
            .collect())
    }

    async fn fulfill_request(&self, request: RequestId) -> Result<()> {
        let mut inner = self.inner.write().await;
        let product = match inner.requests.get_mut(&request) {
            Some(record) if record.status == RequestStatus::Unfulfilled => {
                record.status = RequestStatus::Fulfilled;
                record.product
            }
            // Already fulfilled or never existed: reject without mutating.
            _ => return Err(StoreError::UnknownRequest(request)),
        };
        if let Some(stock) = inner.products.get_mut(&product) {
            stock.quantity += 1;
        }
        tracing::debug!(request = request.get(), product = product.get(), "request fulfilled");
        Ok(())
    }

    async fn total_revenue(&self) -> Result<Decimal> {
        let inner = self.inner.read().await;
        Ok(inner.purchases.values().map(|p| p.price).sum())
    }

    async fn price_and_rating(&self, product: ProductId) -> Result<PriceRating> {
        let inner = self.inner.read().await;
        let record = inner
            .products
            .get(&product)
            .ok_or(StoreError::UnknownProduct(product))?;

        let ratings: Vec<Decimal> = inner
            .purchases
            .iter()
            .filter(|(_, p)| p.product == product)
            .filter_map(|(id, _)| inner.reviews.get(id))
            .map(|r| Decimal::from(r.rating.stars()))
            .collect();
        let raw_average = if ratings.is_empty() {
            Decimal::ZERO
        } else {
            ratings.iter().sum::<Decimal>() / Decimal::from(ratings.len() as u64)
        };

        Ok(PriceRating::from_raw(record.price, raw_average))
    }

    async fn sets_in_theme(&self, theme: &str) -> Result<Vec<SetListing>> {
        let inner = self.inner.read().await;
        Ok(inner
            .products
            .iter()
            .filter(|(id, p)| {
                id.kind() == ProductKind::Set
                    && p.theme
                        .as_deref()
                        .is_some_and(|t| t.eq_ignore_ascii_case(theme))
            })
            .map(|(&product, p)| SetListing {
                product,
                name: p.name.clone(),
                price: p.price,
            })
            .collect())
    }

    async fn sets_within_budget(&self, max_price: Decimal) -> Result<Vec<SetListing>> {
        let inner = self.inner.read().await;
        Ok(inner
            .products
            .iter()
            .filter(|(id, p)| id.kind() == ProductKind::Set && p.price <= max_price)
            .map(|(&product, p)| SetListing {
                product,
                name: p.name.clone(),
                price: p.price,
            })
            .collect())
    }

    async fn inventory(&self, product: ProductId) -> Result<i64> {
        let inner = self.inner.read().await;
        inner
            .products
            .get(&product)
            .map(|p| p.quantity)
            .ok_or(StoreError::UnknownProduct(product))
    }

    async fn record_purchase(&self, product: ProductId, username: &str) -> Result<PurchaseId> {
        let mut inner = self.inner.write().await;
        let (price, quantity) = {
            let record = inner
                .products
                .get_mut(&product)
                .ok_or(StoreError::UnknownProduct(product))?;
            if record.quantity <= 0 {
                return Err(StoreError::OutOfStock(product));
            }
            record.quantity -= 1;
            (record.price, record.quantity)
        };

        inner.next_purchase += 1;
        let purchase = PurchaseId::new(inner.next_purchase);
        inner.purchases.insert(
            purchase,
            PurchaseRecord {
                product,
                customer: username.to_string(),
                price,
            },
        );
        tracing::debug!(
            purchase = purchase.get(),
            product = product.get(),
            remaining = quantity,
            "purchase recorded"
        );
        Ok(purchase)
    }

    async fn record_request(&self, product: ProductId, username: &str) -> Result<RequestId> {
        let mut inner = self.inner.write().await;
        let record = inner
            .products
            .get(&product)
            .ok_or(StoreError::UnknownProduct(product))?;
        if record.quantity > 0 {
            return Err(StoreError::InStock(product));
        }

        inner.next_request += 1;
        let request = RequestId::new(inner.next_request);
        inner.requests.insert(
            request,
            RequestRecord {
                product,
                status: RequestStatus::Unfulfilled,
            },
        );
        tracing::debug!(
            request = request.get(),
            product = product.get(),
            customer = username,
            "restock request recorded"
        );
        Ok(request)
    }

    async fn record_review(&self, purchase: PurchaseId, rating: Rating, text: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        if !inner.purchases.contains_key(&purchase) {
            return Err(StoreError::UnknownPurchase(purchase));
        }
        if inner.reviews.contains_key(&purchase) {
            return Err(StoreError::AlreadyReviewed(purchase));
        }
        inner.reviews.insert(
            purchase,
            ReviewRecord {
                rating,
                text: text.to_string(),
            },
        );
        Ok(())
    }

    async fn purchases_of(&self, username: &str) -> Result<Vec<PurchaseId>> {
        let inner = self.inner.read().await;
        Ok(inner
            .purchases
            .iter()
            .filter(|(_, p)| p.customer == username)
            .map(|(&id, _)| id)
            .collect())
    }

    async fn has_review(&self, purchase: PurchaseId) -> Result<bool> {
        let inner = self.inner.read().await;
        Ok(inner.reviews.contains_key(&purchase))
    }
}
