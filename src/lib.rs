//! Search page behaviour of the price comparison tool: submit validation,
//! toasts, price display, clipboard copy and debounced query input.

pub mod config;
pub mod ui;
pub mod utilities;
