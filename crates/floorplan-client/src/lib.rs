//! Floor-plan evaluation client.
//!
//! Wraps the pure logic crate with the parts that touch the outside world:
//! configuration, the HTTP scorer, an async session that tracks requests in
//! flight, and plain-text reporting for the `floorplan-eval` binary.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Scorer address and timeout from defaults, env, and flags |
//! | [`networking`] | `Scorer` trait, HTTP scorer, bounded-wait evaluation |
//! | [`session`] | View state plus spawned evaluations, stale-response dropping |
//! | [`report`] | Legend, rectangle, and result tables as text or JSON |

pub mod config;
pub mod networking;
pub mod report;
pub mod session;

pub use config::{ClientConfig, ConfigError};
pub use networking::{EvaluationClient, HttpScorer, Scorer};
pub use session::Session;
