//! Utility modules for common functionality
//!
//! Provides reusable file system helpers.

pub mod fs;

pub use fs::FileSystemUtils;
