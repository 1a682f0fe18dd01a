//! `shuttle-model` — the airport shuttle model proper.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`stops`]     | `StopState`, `StopBoard` — pending pickups and drop-offs  |
//! | [`scan`]      | `Direction`, `next_stop` — directional scan dispatch      |
//! | [`world`]     | `ShuttleWorld`, `Handles`, `Census`, `build_scheduler`    |
//! | [`shuttle`]   | `ShuttleState`, `DispatchPhase`, the `Shuttle` process    |
//! | [`passenger`] | the `Passenger` process, `DestinationRule`, `TripRecord`  |
//! | [`generator`] | the `Generator` process, `Stream`                         |
//! | [`error`]     | `ModelError`, `ModelResult<T>`                            |
//!
//! # Primitives
//!
//! Every stop owns a boarding line (`ResourceQueue`), a call button and an
//! invitation (single-release `Signal`s), and a get-off `LevelSignal` raised
//! for riders bound there.  One shared `boarded` signal carries each
//! passenger's acknowledgement back to the shuttle, which keeps boarding
//! strictly one passenger at a time.

pub mod error;
pub mod generator;
pub mod passenger;
pub mod scan;
pub mod shuttle;
pub mod stops;
pub mod world;

#[cfg(test)]
mod tests;

pub use error::{ModelError, ModelResult};
pub use generator::{Generator, Stream};
pub use passenger::{DestinationRule, Passenger, PassengerPhase, TripRecord};
pub use scan::{Direction, first_active_ahead, next_stop};
pub use shuttle::{DispatchPhase, Shuttle, ShuttleState};
pub use stops::{StopBoard, StopState};
pub use world::{Census, Handles, ShuttleWorld, StopHandles, build_scheduler};
