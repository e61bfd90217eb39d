//! A drop-box style object store: uploads land in a tenant's storage root
//! under short generated names, and each one hands back a capability token
//! that authorizes later rename, edit and delete.

pub mod cache;
pub mod common;
pub mod ingest;
pub mod naming;
pub mod persist;
pub mod query;
pub mod registry;
pub mod storage;
pub mod store;
pub mod utils;

pub use common::record::{MediaKind, ObjectRecord};
pub use ingest::{IngestError, UploadReceipt, UploadRequest};
pub use naming::{NameAllocator, NameError, NameGenerator};
pub use query::{DateRange, Mask, PageInfo, PageSelector, QueryError, QueryPage, QueryRequest};
pub use store::config::{ConfigError, StateBackend, TenantConfig};
pub use store::{OpenError, RemoveError, RenameReceipt, Store, UpdateError};

#[cfg(test)]
mod tests {
    mod ingest_test;
    mod mutation_test;
    mod store_test;
}
