//! SafeRoute CLI - command line tools for the SafeRoute server.
//!
//! Binaries:
//! - plan_route: request a hazard-free route between two locations

pub mod client;

pub use client::PlanningClient;
