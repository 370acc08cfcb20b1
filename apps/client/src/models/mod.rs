pub mod matches;
pub mod resume;
