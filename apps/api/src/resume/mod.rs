pub mod chat;
pub mod extract;
pub mod handlers;
pub mod modifications;
pub mod parser;
pub mod render;
