pub mod jsonl;
pub mod save_all;
