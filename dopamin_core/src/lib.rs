//! # Dopamin Core
//!
//! The engagement engine behind the narrative graph UI. This crate ingests
//! discrete interaction events from a simulated multi-agent session and
//! derives a rolling set of scalar signals (reward density, engagement
//! index, coherence, resilience, flow membership) that drive UI feedback.
//!
//! ## Core Components
//!
//! - **trigger**: The append-only interaction event log
//! - **metrics**: The rolling-window calculator and its constants
//! - **engine**: The stateful service object plus the subscription layer
//! - **lore**: The seam to an external generative-text provider
//!
//! ## Design Philosophy
//!
//! - **Synchronous**: Ingestion, recomputation, and notification complete
//!   before the call returns; no interleaving within one engine instance
//! - **Total**: The calculator has no error outcomes - clamping replaces
//!   exceptions for out-of-range intermediate results
//! - **Injected**: The engine is an explicit service object owned by the
//!   application entry point, not a process-wide global

pub mod agent;
pub mod engine;
pub mod lore;
pub mod metrics;
pub mod trigger;

pub use agent::*;
pub use engine::*;
pub use lore::*;
pub use metrics::*;
pub use trigger::*;
