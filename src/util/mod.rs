pub mod format;
pub mod persistence;
