//! Public API:
//! - `VectorSearchClient::retrieve`: similarity query over the managed index, decoded into records.
//! - `VectorSearchClient::retrieve_by_section`: same, filtered on the `section` column.
//! - `VectorSearchClient::health_check`: one-result probe, never fails.

mod client;
pub mod errors;
pub mod structs;

pub use client::VectorSearchClient;
pub use errors::vector_search_error::VectorSearchError;
pub use structs::retrieved_record::{QueryFilters, RetrievedRecord};
pub use structs::vector_search_config::VectorSearchConfig;
