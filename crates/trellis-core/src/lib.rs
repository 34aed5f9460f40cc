pub mod driver;
pub use driver::Driver;

mod error;
pub use error::{Error, Result, ValidationFailure};

pub mod schema;
pub use schema::Repository;

pub mod stmt;

pub mod validate;
pub use validate::{AcceptAll, Validator};

pub use async_trait::async_trait;
