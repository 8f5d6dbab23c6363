//! Top-level facade crate for pulsewatch.
//!
//! Re-exports the measurement core and the gateway library so users can depend on a single crate.

pub mod core {
    pub use pulsewatch_core::*;
}

pub mod gateway {
    pub use pulsewatch_gateway::*;
}
