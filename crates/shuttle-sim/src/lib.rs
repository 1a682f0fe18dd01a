//! `shuttle-sim` — run loop, monitor, and reporting for the airport shuttle
//! simulation.
//!
//! # Run loop
//!
//! ```text
//! SimBuilder::build:
//!   register primitives (per stop: line, call, invite, get-off; shared: boarded)
//!   spawn seeded passengers, the shuttle, one generator per enabled stream
//!
//! ShuttleSim::run:
//!   every monitor_period until the horizon:
//!     ① resume processes up to the report instant
//!     ② observer.on_trip for each passenger who alighted
//!     ③ observer.on_snapshot(Snapshot)
//!   resume processes up to the horizon, then observer.on_sim_end(RunSummary)
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs replication sweeps on Rayon's thread pool.        |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use shuttle_core::ShuttleConfig;
//! use shuttle_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(ShuttleConfig::default()).build()?;
//! let summary = sim.run(&mut NoopObserver)?;
//! println!("{summary}");
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod replicate;
pub mod sim;
pub mod snapshot;
pub mod summary;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use replicate::{replication_seeds, run_replications};
pub use sim::ShuttleSim;
pub use snapshot::{Snapshot, StopSnapshot};
pub use summary::{RunSummary, TripStats};
pub use shuttle_model::TripRecord;
