use crate::domain::order::{PurchaseId, RequestId};
use crate::domain::product::ProductId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Validation(String),
    #[error("no product with ID {0}")]
    UnknownProduct(ProductId),
    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),
    #[error("product {0} is still in stock")]
    InStock(ProductId),
    #[error("no unfulfilled request with ID {0}")]
    UnknownRequest(RequestId),
    #[error("no purchase with ID {0}")]
    UnknownPurchase(PurchaseId),
    #[error("purchase {0} was made by a different customer")]
    NotYourPurchase(PurchaseId),
    #[error("purchase {0} already has a review")]
    AlreadyReviewed(PurchaseId),
    #[error("input cancelled")]
    Cancelled,
    #[error("backend unavailable: {0}")]
    Backend(String),
    #[error("seed data error: {0}")]
    Seed(#[from] serde_json::Error),
    #[cfg(feature = "backend-mysql")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Business-rule conflicts the session loop treats as "try another ID"
    /// rather than as backend failures.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            StoreError::Validation(_)
                | StoreError::UnknownProduct(_)
                | StoreError::OutOfStock(_)
                | StoreError::InStock(_)
                | StoreError::UnknownRequest(_)
                | StoreError::UnknownPurchase(_)
                | StoreError::NotYourPurchase(_)
                | StoreError::AlreadyReviewed(_)
        )
    }
}
