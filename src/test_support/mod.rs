//! Helpers shared by in-crate tests.

pub(crate) mod socket_guard;
