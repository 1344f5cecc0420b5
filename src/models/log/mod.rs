pub mod log_entry;
pub mod log_row;
pub mod new_log_entry;
