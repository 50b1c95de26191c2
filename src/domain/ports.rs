use super::order::{PendingRequest, PriceRating, PurchaseId, Rating, RequestId, SetListing};
use super::product::ProductId;
use super::session::Role;
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// The backend surface the store exposes: membership and credential checks,
/// catalog reads, and the mutation procedures.
///
/// Check-and-act rules (inventory, request status, duplicate reviews) are
/// enforced atomically inside each implementation; the mutating operations
/// return typed conflict errors rather than trusting callers to pre-check.
/// Purchase and request recording return the generated identifier directly,
/// so no caller ever has to re-query "the most recent row".
#[async_trait]
pub trait StoreBackend: Send + Sync {
    async fn member_exists(&self, role: Role, username: &str) -> Result<bool>;
    async fn check_credentials(&self, username: &str, password: &str) -> Result<bool>;

    async fn pending_requests(&self) -> Result<Vec<PendingRequest>>;
    async fn fulfill_request(&self, request: RequestId) -> Result<()>;
    async fn total_revenue(&self) -> Result<Decimal>;

    async fn price_and_rating(&self, product: ProductId) -> Result<PriceRating>;
    async fn sets_in_theme(&self, theme: &str) -> Result<Vec<SetListing>>;
    async fn sets_within_budget(&self, max_price: Decimal) -> Result<Vec<SetListing>>;
    async fn inventory(&self, product: ProductId) -> Result<i64>;

    async fn record_purchase(&self, product: ProductId, username: &str) -> Result<PurchaseId>;
    async fn record_request(&self, product: ProductId, username: &str) -> Result<RequestId>;
    async fn record_review(&self, purchase: PurchaseId, rating: Rating, text: &str) -> Result<()>;

    async fn purchases_of(&self, username: &str) -> Result<Vec<PurchaseId>>;
    async fn has_review(&self, purchase: PurchaseId) -> Result<bool>;
}

pub type BackendBox = Box<dyn StoreBackend>;
