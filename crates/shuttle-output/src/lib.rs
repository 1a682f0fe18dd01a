//! `shuttle-output` — simulation output writers for the airport shuttle.
//!
//! | Writer       | Files                                         |
//! |--------------|-----------------------------------------------|
//! | [`CsvWriter`] | `snapshots.csv`, `stops.csv`, `trips.csv`    |
//!
//! Attach a [`SimOutputObserver`] wrapping a writer to
//! `ShuttleSim::run`; the writer is flushed when the run ends.

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{ShuttleRow, StopRow, TripRow};
pub use writer::OutputWriter;
