//! Type definitions for handlers
//!
//! Request bodies live next to the services that consume them; this module
//! holds the envelopes every endpoint shares.

pub mod common;

pub use common::*;
