//! CSV output backend.
//!
//! Creates three files in the output directory:
//! - `snapshots.csv` — one row per monitor instant (shuttle state)
//! - `stops.csv` — one row per stop per monitor instant
//! - `trips.csv` — one row per completed journey

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{OutputResult, ShuttleRow, StopRow, TripRow};
use crate::writer::OutputWriter;

/// Writes simulation output to CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    stops:     Writer<File>,
    trips:     Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the three CSV files in `dir` and write their headers.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("snapshots.csv"))?;
        snapshots.write_record([
            "time", "stop", "direction", "phase", "next_stop", "riders", "seats",
            "over_capacity", "spawned", "alighted",
        ])?;

        let mut stops = Writer::from_path(dir.join("stops.csv"))?;
        stops.write_record([
            "time", "stop", "pending_pickup", "pending_dropoff", "in_line", "call_lit",
        ])?;

        let mut trips = Writer::from_path(dir.join("trips.csv"))?;
        trips.write_record([
            "passenger", "stream", "origin", "destination", "joined", "boarded", "alighted",
            "wait", "ride",
        ])?;

        Ok(Self { snapshots, stops, trips, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshot(&mut self, shuttle: &ShuttleRow, stops: &[StopRow]) -> OutputResult<()> {
        self.snapshots.write_record(&[
            shuttle.time.to_string(),
            shuttle.stop.to_string(),
            shuttle.direction.to_string(),
            shuttle.phase.clone(),
            shuttle.next_stop.to_string(),
            shuttle.riders.to_string(),
            shuttle.seats.to_string(),
            shuttle.over_capacity.to_string(),
            shuttle.spawned.to_string(),
            shuttle.alighted.to_string(),
        ])?;
        for row in stops {
            self.stops.write_record(&[
                row.time.to_string(),
                row.stop.to_string(),
                row.pending_pickup.to_string(),
                row.pending_dropoff.to_string(),
                row.in_line.to_string(),
                row.call_lit.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_trip(&mut self, row: &TripRow) -> OutputResult<()> {
        self.trips.write_record(&[
            row.passenger.to_string(),
            row.stream.to_string(),
            row.origin.to_string(),
            row.destination.to_string(),
            row.joined.to_string(),
            row.boarded.to_string(),
            row.alighted.to_string(),
            row.wait.to_string(),
            row.ride.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.snapshots.flush()?;
        self.stops.flush()?;
        self.trips.flush()?;
        self.finished = true;
        Ok(())
    }
}
