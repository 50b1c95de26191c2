use crate::error::StoreError;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Set IDs and part IDs live in two disjoint ranges; everything else is
/// invalid input, rejected before any backend round-trip.
pub const SET_IDS: RangeInclusive<u32> = 1..=11_673;
pub const PART_IDS: RangeInclusive<u32> = 100_000..=125_992;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKind {
    Set,
    Part,
}

/// Identifier of a catalog product, validated against the range partition.
///
/// Constructing a `ProductId` guarantees the raw value falls in exactly one
/// of the two ranges, so handlers never have to re-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(u32);

impl ProductId {
    pub fn new(raw: u32) -> Result<Self, StoreError> {
        if SET_IDS.contains(&raw) || PART_IDS.contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(StoreError::Validation(format!(
                "product ID {raw} is outside both the set and part ranges"
            )))
        }
    }

    pub fn kind(self) -> ProductKind {
        if SET_IDS.contains(&self.0) {
            ProductKind::Set
        } else {
            ProductKind::Part
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl FromStr for ProductId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u32 = s
            .trim()
            .parse()
            .map_err(|_| StoreError::Validation(format!("product ID must be a number, got {s:?}")))?;
        Self::new(raw)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
