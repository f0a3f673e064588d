pub mod format;
pub mod report;
pub mod session;
pub mod statistics;
