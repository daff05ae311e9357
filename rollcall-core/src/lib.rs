// src/lib.rs

pub mod batching;
pub mod config;
pub mod platforms;
pub mod services;

pub use config::RollcallConfig;
pub use rollcall_common::error::Error;
