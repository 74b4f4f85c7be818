pub mod query;
pub mod retrieved_record;
pub mod vector_search_config;
