//! Data-access engine for the bookswap textbook marketplace.
//!
//! Every domain service (users, listings, messages, reports) talks to the
//! database exclusively through [`store::DataStore`]: a bounded connection
//! pool, a schema-agnostic query builder over field maps, positional-marker
//! binding, idempotent schema bootstrap with lookup-table seeding, and a
//! background pruning scheduler for time-expiring records.
//!
//! ```rust,no_run
//! use bookswap_store::prelude::*;
//!
//! # async fn demo() -> Result<(), StoreError> {
//! let config = StoreConfig::from_env()?;
//! let store = DataStore::connect(&config).await?;
//! let (_scheduler, _report) = bookswap_store::schema::run(&store, &config.maintenance).await?;
//!
//! let listing = store
//!     .create(
//!         "listings",
//!         &FieldMap::new()
//!             .set("seller_id", 1i64)
//!             .set("category_id", 2i64)
//!             .set("condition_id", 3i64)
//!             .set("title", "Linear Algebra Done Right")
//!             .set("price", 24.50),
//!     )
//!     .await?;
//! # let _ = listing;
//! # Ok(()) }
//! ```

pub mod coerce;
pub mod config;
pub mod error;
pub mod fields;
pub mod maintenance;
pub mod placeholders;
pub mod pool;
pub mod query_builder;
pub mod results;
pub mod schema;
pub mod store;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub mod prelude;

pub use error::StoreError;
pub use fields::{FieldMap, OrderBy, SortDirection};
pub use results::{Record, ResultSet};
pub use store::DataStore;
pub use types::{DatabaseType, DbValue, QueryAndParams};
