mod config;
mod executor;
mod params;
mod query;
mod transaction;

pub use config::build_pool;
pub use executor::{execute_batch, execute_dml, execute_select};
pub use params::Params;
pub use query::{build_result_set, extract_value};
pub use transaction::run_transaction;
