pub mod demo;
pub mod in_memory;
#[cfg(feature = "backend-mysql")]
pub mod mysql;

use crate::domain::ports::BackendBox;
use crate::error::Result;

/// Connection parameters for the backing store, taken from flags or the
/// `BRICKSHOP_DB_*` environment.
#[derive(Debug, Clone, clap::Args)]
pub struct ConnectionOpts {
    #[arg(long, env = "BRICKSHOP_DB_HOST", default_value = "localhost")]
    pub host: String,

    #[arg(long, env = "BRICKSHOP_DB_PORT", default_value_t = 3306)]
    pub port: u16,

    #[arg(long, env = "BRICKSHOP_DB_USER", default_value = "brickshop")]
    pub user: String,

    #[arg(long, env = "BRICKSHOP_DB_PASSWORD", default_value = "")]
    pub password: String,

    #[arg(long, env = "BRICKSHOP_DB_NAME", default_value = "brickshop")]
    pub database: String,
}

/// Opens the database backend. A failure here is fatal to the front ends.
#[cfg(feature = "backend-mysql")]
pub async fn connect(opts: &ConnectionOpts) -> Result<BackendBox> {
    let backend = mysql::MySqlBackend::connect(opts).await?;
    Ok(Box::new(backend))
}

#[cfg(not(feature = "backend-mysql"))]
pub async fn connect(_opts: &ConnectionOpts) -> Result<BackendBox> {
    Err(crate::error::StoreError::Backend(
        "this build has no database backend; rerun with --demo or rebuild with \
         --features backend-mysql"
            .to_string(),
    ))
}
