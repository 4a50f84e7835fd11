//! Convenient imports for common functionality.

pub use crate::coerce;
pub use crate::config::{DatabaseSettings, MaintenanceSettings, StoreConfig};
pub use crate::error::StoreError;
pub use crate::fields::{FieldMap, OrderBy, SortDirection, quote_ident};
pub use crate::maintenance::{MaintenanceScheduler, PruneSpec, Routine, TrimSpec};
pub use crate::placeholders::{PlaceholderStyle, bind_markers};
pub use crate::pool::connection::StatementExecutor;
pub use crate::pool::{StoreConnection, StorePool};
pub use crate::results::{Record, ResultSet};
pub use crate::schema::{Bootstrap, BootstrapState, SeedReport};
pub use crate::store::DataStore;
pub use crate::types::{DatabaseType, DbValue, QueryAndParams};
