//! Platform bindings
//!
//! - `web`: `Host` implementation that forwards to the JS scene engine

#[cfg(target_arch = "wasm32")]
pub mod web;
