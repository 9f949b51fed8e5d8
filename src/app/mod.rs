//! Application runtime composition modules.

pub(crate) mod cert_gate;
pub(crate) mod exit_handler;
pub(crate) mod runtime;
pub(crate) mod shutdown;
pub(crate) mod terminal;
