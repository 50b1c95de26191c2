use crate::domain::product::ProductId;
use crate::error::StoreError;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Longest review text the store accepts, in characters.
pub const MAX_REVIEW_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RequestId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u64 = s
            .trim()
            .parse()
            .map_err(|_| StoreError::Validation(format!("request ID must be a number, got {s:?}")))?;
        Ok(Self(raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PurchaseId(u64);

impl PurchaseId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PurchaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PurchaseId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u64 = s.trim().parse().map_err(|_| {
            StoreError::Validation(format!("purchase ID must be a number, got {s:?}"))
        })?;
        if raw == 0 {
            return Err(StoreError::Validation(
                "purchase IDs start at 1".to_string(),
            ));
        }
        Ok(Self(raw))
    }
}

/// A star rating, constrained to 1..=5 at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating(u8);

impl Rating {
    pub fn new(stars: u8) -> Result<Self, StoreError> {
        if (1..=5).contains(&stars) {
            Ok(Self(stars))
        } else {
            Err(StoreError::Validation(
                "ratings are integers between 1 and 5".to_string(),
            ))
        }
    }

    pub fn stars(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validates review text length without copying it.
pub fn validate_review_text(text: &str) -> Result<&str, StoreError> {
    if text.chars().count() <= MAX_REVIEW_CHARS {
        Ok(text)
    } else {
        Err(StoreError::Validation(format!(
            "reviews are limited to {MAX_REVIEW_CHARS} characters"
        )))
    }
}

/// A restock request as listed for admins: which request, for which product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRequest {
    pub request: RequestId,
    pub product: ProductId,
}

/// One row of a catalog search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SetListing {
    pub product: ProductId,
    pub name: String,
    pub price: Decimal,
}

/// Price plus average rating for one product.
///
/// The backend reports "no ratings yet" as a zero average; that sentinel is
/// converted to `None` here so callers never confuse it with a real rating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRating {
    pub price: Decimal,
    pub rating: Option<Decimal>,
}

impl PriceRating {
    pub fn from_raw(price: Decimal, raw_rating: Decimal) -> Self {
        let rating = if raw_rating.is_zero() {
            None
        } else {
            Some(raw_rating)
        };
        Self { price, rating }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert_eq!(Rating::new(1).unwrap().stars(), 1);
        assert_eq!(Rating::new(5).unwrap().stars(), 5);
        assert!(Rating::new(6).is_err());
    }

    #[test]
    fn test_review_text_limit() {
        assert!(validate_review_text("great bricks").is_ok());
        assert!(validate_review_text(&"x".repeat(MAX_REVIEW_CHARS)).is_ok());
        assert!(validate_review_text(&"x".repeat(MAX_REVIEW_CHARS + 1)).is_err());
    }

    #[test]
    fn test_purchase_id_parse() {
        assert_eq!("12".parse::<PurchaseId>().unwrap().get(), 12);
        assert!("0".parse::<PurchaseId>().is_err());
        assert!("twelve".parse::<PurchaseId>().is_err());
    }

    #[test]
    fn test_zero_rating_means_no_reviews() {
        let pr = PriceRating::from_raw(dec!(19.99), dec!(0));
        assert_eq!(pr.rating, None);

        let pr = PriceRating::from_raw(dec!(19.99), dec!(4.5));
        assert_eq!(pr.rating, Some(dec!(4.5)));
    }
}
