//! `SimOutputObserver` — bridges `SimObserver` callbacks to an `OutputWriter`.

use shuttle_model::TripRecord;
use shuttle_sim::{RunSummary, SimObserver, Snapshot};

use crate::writer::OutputWriter;
use crate::{OutputError, ShuttleRow, StopRow, TripRow};

/// A [`SimObserver`] that writes monitor snapshots and completed trips to
/// any [`OutputWriter`].
///
/// # Error handling
///
/// Observer callbacks are infallible.  The first write error is stored and
/// later ones are dropped; check it with [`take_error`][Self::take_error]
/// after the run.
///
/// # Usage
///
/// ```rust,ignore
/// let writer = CsvWriter::new(Path::new("out/"))?;
/// let mut obs = SimOutputObserver::new(writer);
/// sim.run(&mut obs)?;
/// if let Some(e) = obs.take_error() { return Err(e.into()); }
/// ```
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    stop_rows:  Vec<StopRow>,
    snapshots:  u64,
    trips:      u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, stop_rows: Vec::new(), snapshots: 0, trips: 0, last_error: None }
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Snapshots and trips handed to the writer so far.
    pub fn written(&self) -> (u64, u64) {
        (self.snapshots, self.trips)
    }

    /// Consume the observer and return the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: Result<(), OutputError>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        let time = snapshot.time.as_f64();
        self.stop_rows.clear();
        self.stop_rows.extend(snapshot.stops.iter().map(|s| StopRow::new(time, s)));

        let result = self.writer.write_snapshot(&ShuttleRow::from(snapshot), &self.stop_rows);
        self.snapshots += 1;
        self.store_err(result);
    }

    fn on_trip(&mut self, trip: &TripRecord) {
        let result = self.writer.write_trip(&TripRow::from(trip));
        self.trips += 1;
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _summary: &RunSummary) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
