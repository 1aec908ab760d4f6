//! Utility modules: build info, logging and the application directory.

pub mod build_info;
pub mod logging;
pub mod persistence;
