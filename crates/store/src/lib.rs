//! Backend interfaces for the course catalog.
//!
//! Two independently-failing backends back the catalog: a relational store
//! ([`CatalogStore`]) holding course, video, and enrollment rows, and a binary
//! object store ([`ObjectStore`]) holding uploaded video files. The creation
//! saga in the `saga` crate coordinates writes across the two; everything
//! here is a plain client with no cross-backend knowledge.
//!
//! Three implementations are provided:
//! - in-memory fakes with failure and hang injection for tests,
//! - a PostgreSQL catalog store over sqlx,
//! - an HTTP object store speaking the Supabase-storage wire shape.

pub mod catalog;
pub mod error;
pub mod http;
pub mod memory;
pub mod object;
pub mod postgres;

pub use catalog::CatalogStore;
pub use error::{Result, StoreError};
pub use http::HttpObjectStore;
pub use memory::{InMemoryCatalogStore, InMemoryObjectStore};
pub use object::{ObjectStore, UploadOptions};
pub use postgres::PostgresCatalogStore;
