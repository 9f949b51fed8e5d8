//! Helpers shared by unit tests across the crate.

pub mod mock_client;
pub mod socket_guard;
