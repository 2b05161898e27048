//! ascii-cam library crate.
//!
//! Exposes the internal components for integration testing.

pub mod ascii;
pub mod camera;
pub mod cli;
pub mod config;
pub mod display;
pub mod event_loop;
pub mod export;
pub mod frame;
pub mod input;
pub mod render_loop;
pub mod sampler;
pub mod scheduler;
