//! `shuttle-core` — foundational types for the shuttle simulation workspace.
//!
//! This crate is a dependency of every other `shuttle-*` crate.  It has no
//! `shuttle-*` dependencies and few external ones (`rand`, `rand_distr`,
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `ProcessId`, `StopId`, `QueueId`, `SignalId`, `LevelId`, `PassengerId` |
//! | [`time`]    | `SimTime`, `SimDuration`                                  |
//! | [`rng`]     | `SimRng`, the `Distributions` sampling trait              |
//! | [`config`]  | `ShuttleConfig`, `GroupSizes`, `Interarrivals`, `BoundaryRule` |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and configuration.   |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{BoundaryRule, GroupSizes, GroupWeight, Interarrivals, ShuttleConfig};
pub use error::{CoreError, CoreResult};
pub use ids::{LevelId, PassengerId, ProcessId, QueueId, SignalId, StopId};
pub use rng::{Distributions, SimRng};
pub use time::{SimDuration, SimTime};
