pub mod file;
pub mod recorder;
pub mod report;

pub use recorder::{FileRecorder, ResultRecord, ResultRecorder};
