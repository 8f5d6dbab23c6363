//! pulsewatch gateway library entry.
//!
//! This crate wires the measurement core into an HTTP surface: scrape and
//! health endpoints, system/business metrics, the demo log service, and the
//! periodic sample trigger. It is consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod scheduler;
pub mod services;
