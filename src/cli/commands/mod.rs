//! Command implementations, one module per subcommand.

pub mod audit_cmd;
pub mod consume;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod providers;
pub mod stats;
pub mod toggle;
pub mod update;
