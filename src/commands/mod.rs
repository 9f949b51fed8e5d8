//! CLI command handlers.
//!
//! Handlers receive the client as `dyn SdtpClient` and return the process
//! outcome; fatal SDTP errors are logged here with their kind preserved.

mod check;
mod ingest;
mod list;
mod register;
#[cfg(test)]
mod test_client;

pub use check::run_check_command;
pub use ingest::run_ingest_command;
pub use list::run_list_command;
pub use register::run_register_command;
