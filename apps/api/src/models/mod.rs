pub mod job;
pub mod results;
pub mod resume;
