//! Independent replications of one configuration.

use shuttle_core::{ShuttleConfig, SimRng};

use crate::{NoopObserver, RunSummary, SimBuilder, SimError, SimResult};

/// `count` replication seeds derived from `master`.
pub fn replication_seeds(master: u64, count: usize) -> Vec<u64> {
    let mut rng = SimRng::new(master);
    (0..count as u64).map(|i| rng.child_seed(i)).collect()
}

/// Run `config` once per seed and return the summaries in seed order.
///
/// With the `parallel` feature the runs share Rayon's thread pool.  Every
/// run owns its scheduler and RNG, so the results do not depend on it.
pub fn run_replications(config: &ShuttleConfig, seeds: &[u64]) -> SimResult<Vec<RunSummary>> {
    if seeds.is_empty() {
        return Err(SimError::Config("at least one replication seed is required".into()));
    }

    let run_one = |seed: u64| -> SimResult<RunSummary> {
        let config = ShuttleConfig { seed, ..config.clone() };
        SimBuilder::new(config).build()?.run(&mut NoopObserver)
    };

    #[cfg(not(feature = "parallel"))]
    {
        seeds.iter().map(|&seed| run_one(seed)).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        seeds.par_iter().map(|&seed| run_one(seed)).collect()
    }
}
