pub mod debounce;
pub mod format_price;
pub mod results_reader;
