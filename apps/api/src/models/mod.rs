pub mod report;
pub mod sample;
