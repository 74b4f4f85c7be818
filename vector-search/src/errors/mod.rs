pub mod vector_search_error;
