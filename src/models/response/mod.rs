pub mod health;
pub mod log_page;
pub mod log_stats;
pub mod mutation;
