pub mod handlers;
pub mod link;
pub mod metadata;
