pub mod chat_service;
