//! CLI command implementations.

pub mod describe;
pub mod menu;

pub use describe::DescribeCommand;
pub use menu::MenuCommand;
