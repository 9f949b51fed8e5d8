//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod creds;
pub mod socket_guard;
