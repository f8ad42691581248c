pub mod entity;
pub mod error;
pub mod repository;
pub mod store;
pub mod table;

pub use error::StoreError;
pub use store::{Store, StoreCounts};
