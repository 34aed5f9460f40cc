mod db;
pub use db::Client;

mod engine;

mod mapper;

pub mod query;

mod table;
pub use table::Table;

mod transaction;
pub use transaction::Batch;

pub use trellis_core::{driver, schema, stmt, AcceptAll, Error, Result, Validator};
