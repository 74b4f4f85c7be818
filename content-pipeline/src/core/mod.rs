pub mod chunking;
pub mod clean;
pub mod summary;
