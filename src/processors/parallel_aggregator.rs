use crate::error::{ProcessingError, Result};
use crate::models::{Forecast, GridRecord, QuantityTable};
use crate::processors::{AggregationStats, ForecastAggregator};
use crate::utils::constants::DEFAULT_PARALLEL_THRESHOLD;
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Aggregates large record sets across a rayon pool.
///
/// Records are sharded by location key, keeping input order inside each
/// shard. A location never spans two shards, so merging the partial
/// forecasts cannot reorder writes to a slot and the result equals the
/// sequential aggregation.
pub struct ParallelAggregator {
    max_workers: usize,
    parallel_threshold: usize,
    aggregator: ForecastAggregator,
}

impl ParallelAggregator {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            aggregator: ForecastAggregator::new(),
        }
    }

    /// Inputs smaller than `threshold` records run sequentially
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_quantities(mut self, quantities: QuantityTable) -> Self {
        self.aggregator = ForecastAggregator::with_quantities(quantities);
        self
    }

    pub fn aggregate(
        &self,
        records: &[GridRecord],
        progress: Option<&ProgressReporter>,
    ) -> Result<(Forecast, AggregationStats)> {
        if self.max_workers == 1 || records.len() < self.parallel_threshold {
            debug!(records = records.len(), "Aggregating sequentially");
            return Ok(self.aggregator.aggregate_with_stats(records));
        }

        let shards = self.partition(records);
        let total_shards = shards.len();
        let finished_shards = AtomicUsize::new(0);

        info!(
            records = records.len(),
            shards = total_shards,
            workers = self.max_workers,
            "Aggregating in parallel"
        );

        if let Some(p) = progress {
            p.set_message(&format!("Aggregating {} shards...", total_shards));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let partials: Vec<(Forecast, AggregationStats)> = pool.install(|| {
            shards
                .into_par_iter()
                .map(|shard| {
                    let result = self.aggregator.fold(shard);

                    let count = finished_shards.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(p) = progress {
                        p.update(count as u64);
                    }

                    result
                })
                .collect()
        });

        let mut forecast = Forecast::new();
        let mut stats = AggregationStats::default();
        for (partial, partial_stats) in partials {
            forecast.merge(partial);
            stats.absorb(partial_stats);
        }
        stats.report_unknown();

        Ok((forecast, stats))
    }

    /// Split records into one shard per worker by location hash, preserving order
    fn partition<'a>(&self, records: &'a [GridRecord]) -> Vec<Vec<&'a GridRecord>> {
        let shard_count = self.max_workers;
        let mut shards: Vec<Vec<&GridRecord>> = (0..shard_count)
            .map(|_| Vec::with_capacity(records.len() / shard_count + 1))
            .collect();

        for record in records {
            let mut hasher = DefaultHasher::new();
            record.location_key().hash(&mut hasher);
            let shard = (hasher.finish() % shard_count as u64) as usize;
            shards[shard].push(record);
        }

        shards
    }
}

impl Default for ParallelAggregator {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
