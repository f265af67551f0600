//! Command implementations.

pub mod build;
pub mod config;
pub mod layout;
pub mod summary;

pub use self::build::execute_build;
pub use self::config::execute_config;
pub use self::layout::execute_layout;
pub use self::summary::execute_summary;
