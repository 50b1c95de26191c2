use super::ConnectionOpts;
use crate::domain::order::{
    PendingRequest, PriceRating, PurchaseId, Rating, RequestId, SetListing,
};
use crate::domain::ports::StoreBackend;
use crate::domain::product::ProductId;
use crate::domain::session::Role;
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::Row;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};

/// MySQL adapter over the store's stored-procedure surface.
///
/// All statements are parameterized; no user input is ever spliced into SQL
/// text. The mutation procedures run their own transactions and the
/// purchase/request procedures return the generated identifier as a one-row
/// result set, so there is no read-after-write re-query here.
pub struct MySqlBackend {
    pool: MySqlPool,
}

impl MySqlBackend {
    pub async fn connect(opts: &ConnectionOpts) -> Result<Self> {
        let options = MySqlConnectOptions::new()
            .host(&opts.host)
            .port(opts.port)
            .username(&opts.user)
            .password(&opts.password)
            .database(&opts.database);
        // The session clients are single-threaded; one connection is enough.
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        tracing::info!(host = %opts.host, database = %opts.database, "connected");
        Ok(Self { pool })
    }
}

#[async_trait]
impl StoreBackend for MySqlBackend {
    async fn member_exists(&self, role: Role, username: &str) -> Result<bool> {
        let sql = match role {
            Role::Employee => "SELECT employee_username FROM employees WHERE employee_username = ?",
            Role::Customer => "SELECT customer_username FROM customers WHERE customer_username = ?",
        };
        let found = sqlx::query_scalar::<_, String>(sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    async fn check_credentials(&self, username: &str, password: &str) -> Result<bool> {
        let ok: i64 = sqlx::query_scalar("SELECT authenticate(?, ?)")
            .bind(username)
            .bind(password)
            .fetch_one(&self.pool)
            .await?;
        Ok(ok == 1)
    }

    async fn pending_requests(&self) -> Result<Vec<PendingRequest>> {
        let rows = sqlx::query(
            "SELECT request_id, product_id FROM requests WHERE request_status = 'U'",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|row| {
                Ok(PendingRequest {
                    request: RequestId::new(row.try_get::<u64, _>("request_id")?),
                    product: ProductId::new(row.try_get::<u32, _>("product_id")?)?,
                })
            })
            .collect()
    }

    async fn fulfill_request(&self, request: RequestId) -> Result<()> {
        sqlx::query("CALL fulfill_request(?)")
            .bind(request.get())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn total_revenue(&self) -> Result<Decimal> {
        let revenue: Decimal = sqlx::query_scalar("CALL show_total_revenue()")
            .fetch_one(&self.pool)
            .await?;
        Ok(revenue)
    }

    async fn price_and_rating(&self, product: ProductId) -> Result<PriceRating> {
        let row = sqlx::query("CALL get_price_and_rating(?)")
            .bind(product.get())
            .fetch_one(&self.pool)
            .await?;
        let price: Decimal = row.try_get(0)?;
        let raw_rating: Decimal = row.try_get(1)?;
        Ok(PriceRating::from_raw(price, raw_rating))
    }

    async fn sets_in_theme(&self, theme: &str) -> Result<Vec<SetListing>> {
        let rows = sqlx::query("CALL get_sets_in_theme(?)")
            .bind(theme)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(listing_from_row).collect()
    }

    async fn sets_within_budget(&self, max_price: Decimal) -> Result<Vec<SetListing>> {
        let rows = sqlx::query("CALL get_sets_max_price(?)")
            .bind(max_price)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(listing_from_row).collect()
    }

    async fn inventory(&self, product: ProductId) -> Result<i64> {
        let quantity: i64 =
            sqlx::query_scalar("SELECT quantity FROM product_inventory WHERE product_id = ?")
                .bind(product.get())
                .fetch_one(&self.pool)
                .await?;
        Ok(quantity)
    }

    async fn record_purchase(&self, product: ProductId, username: &str) -> Result<PurchaseId> {
        let purchase: u64 = sqlx::query_scalar("CALL make_purchase(?, ?)")
            .bind(product.get())
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(PurchaseId::new(purchase))
    }

    async fn record_request(&self, product: ProductId, username: &str) -> Result<RequestId> {
        let request: u64 = sqlx::query_scalar("CALL request_additional_inventory(?, ?)")
            .bind(product.get())
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(RequestId::new(request))
    }

    async fn record_review(&self, purchase: PurchaseId, rating: Rating, text: &str) -> Result<()> {
        sqlx::query("CALL write_review(?, ?, ?)")
            .bind(purchase.get())
            .bind(rating.stars() as u32)
            .bind(text)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn purchases_of(&self, username: &str) -> Result<Vec<PurchaseId>> {
        let ids: Vec<u64> =
            sqlx::query_scalar("SELECT purchase_id FROM purchases WHERE customer_username = ?")
                .bind(username)
                .fetch_all(&self.pool)
                .await?;
        Ok(ids.into_iter().map(PurchaseId::new).collect())
    }

    async fn has_review(&self, purchase: PurchaseId) -> Result<bool> {
        let found: Option<u64> =
            sqlx::query_scalar("SELECT purchase_id FROM reviews WHERE purchase_id = ?")
                .bind(purchase.get())
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }
}

fn listing_from_row(row: sqlx::mysql::MySqlRow) -> Result<SetListing> {
    Ok(SetListing {
        product: ProductId::new(row.try_get::<u32, _>("product_id")?)?,
        name: row.try_get("product_name")?,
        price: row.try_get("price")?,
    })
}
