// File I/O operations

pub mod backup;
pub mod json;

pub use backup::{BackupInfo, LibraryDir};
