pub mod job;
pub mod modification;
pub mod resume;
