pub mod fences;
pub mod handlers;
pub mod sanitize;
