pub mod device;
pub mod probe;
pub mod report;
