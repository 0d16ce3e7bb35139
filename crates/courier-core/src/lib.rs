//! Service plumbing shared by Courier binaries: configuration, tracing, HTTP middleware.

pub mod config;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
