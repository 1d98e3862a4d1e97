//! # Outdial
//!
//! Outdial is an in-process library for placing and scheduling outbound
//! AI-voice calls through a hosted voice-calling API.
//!
//! ## Features
//!
//! - Immediate call placement with phone number normalization (E.164)
//! - "Call later" scheduling: absolute instants or a daily time-of-day in
//!   any IANA timezone, resolved to the next occurrence
//! - A background sweep that places due calls once, records the outcome,
//!   and purges stale terminal entries after a retention window
//! - Pluggable placement backend behind the [`placer::CallPlacer`] trait
//!
//! The store is memory-resident: a process restart drops pending entries.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use outdial::placer::HttpCallPlacer;
//! use outdial::{CallRequest, CallSchedule, CallScheduler, SchedulerConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let placer = Arc::new(
//!         HttpCallPlacer::builder()
//!             .base_url("https://api.vapi.ai")
//!             .api_key(std::env::var("VOICE_API_KEY")?)
//!             .build()?,
//!     );
//!
//!     let scheduler = CallScheduler::new(placer, SchedulerConfig::default());
//!     scheduler.start();
//!
//!     let request = CallRequest::builder()
//!         .customer_name("Jordan Reyes")
//!         .phone_number("(415) 555-0000")
//!         .assistant_id("asst_listing_followup")
//!         .phone_number_id("line_sf_office")
//!         .build()?;
//!
//!     // Placed by the sweep at the next 5pm New York time.
//!     let response =
//!         scheduler.schedule(request, CallSchedule::time_of_day("17:00", "America/New_York"))?;
//!     println!("scheduled call {}", response.id);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Public module exports
pub mod call;
pub mod error;

// Placement boundary
pub mod placer;

// Scheduler
pub mod scheduler;

// Re-export common types
pub use call::{CallRequest, CallResponse, CallSchedule, CallStatus, ScheduledCall};
pub use error::{Error, Result};
pub use scheduler::{CallScheduler, SchedulerConfig, SchedulerStats, SweepReport};
