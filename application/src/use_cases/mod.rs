//! Use cases (application services)

pub mod dispatch_tool;
pub mod list_tools;
