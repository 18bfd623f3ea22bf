use crate::error::Result;
use crate::models::{Forecast, GridRecord, QuantityTable};
use crate::readers::RecordDecoder;
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Counters collected while aggregating
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationStats {
    pub records_seen: usize,
    pub records_applied: usize,
    pub records_unknown: usize,
    pub records_filtered: usize,
    pub unknown_quantities: BTreeMap<String, usize>,
}

impl AggregationStats {
    pub fn absorb(&mut self, other: AggregationStats) {
        self.records_seen += other.records_seen;
        self.records_applied += other.records_applied;
        self.records_unknown += other.records_unknown;
        self.records_filtered += other.records_filtered;
        for (id, count) in other.unknown_quantities {
            *self.unknown_quantities.entry(id).or_insert(0) += count;
        }
    }

    /// One warning per distinct unknown identifier
    pub fn report_unknown(&self) {
        for (id, count) in &self.unknown_quantities {
            warn!(quantity = %id, records = count, "Unknown quantity, records skipped");
        }
    }
}

impl fmt::Display for AggregationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Records seen:     {}", self.records_seen)?;
        writeln!(f, "Records applied:  {}", self.records_applied)?;
        writeln!(f, "Records filtered: {}", self.records_filtered)?;
        write!(f, "Unknown quantity: {}", self.records_unknown)?;
        for (id, count) in &self.unknown_quantities {
            write!(f, "\n  {}: {}", id, count)?;
        }
        Ok(())
    }
}

/// Folds grid records into a [`Forecast`] in a single pass.
///
/// Each record sets exactly one field of the item for its (location,
/// valid-time). Repeated records for the same slot and quantity overwrite
/// earlier ones in input order. Records with an unrecognized quantity still
/// create their slot but leave its fields untouched.
pub struct ForecastAggregator {
    quantities: QuantityTable,
}

impl ForecastAggregator {
    pub fn new() -> Self {
        Self {
            quantities: QuantityTable::default(),
        }
    }

    pub fn with_quantities(quantities: QuantityTable) -> Self {
        Self { quantities }
    }

    pub fn aggregate<I>(&self, records: I) -> Forecast
    where
        I: IntoIterator,
        I::Item: Borrow<GridRecord>,
    {
        self.aggregate_with_stats(records).0
    }

    pub fn aggregate_with_stats<I>(&self, records: I) -> (Forecast, AggregationStats)
    where
        I: IntoIterator,
        I::Item: Borrow<GridRecord>,
    {
        let (forecast, stats) = self.fold(records);
        stats.report_unknown();
        (forecast, stats)
    }

    /// Aggregate without logging unknown quantities; callers merging partial
    /// results report once on the combined stats
    pub(crate) fn fold<I>(&self, records: I) -> (Forecast, AggregationStats)
    where
        I: IntoIterator,
        I::Item: Borrow<GridRecord>,
    {
        let mut forecast = Forecast::new();
        let mut stats = AggregationStats::default();

        for record in records {
            self.apply(&mut forecast, record.borrow(), &mut stats);
        }

        (forecast, stats)
    }

    /// Decode `bytes` and aggregate the result; decoder failures pass through unchanged
    pub fn aggregate_bytes(
        &self,
        decoder: &dyn RecordDecoder,
        bytes: &[u8],
    ) -> Result<(Forecast, AggregationStats)> {
        let records = decoder.decode(bytes)?;
        Ok(self.aggregate_with_stats(records))
    }

    /// Fold one record into `forecast`
    pub fn apply(&self, forecast: &mut Forecast, record: &GridRecord, stats: &mut AggregationStats) {
        stats.records_seen += 1;

        let item = forecast.slot_mut(record.location_key(), record.valid_time);

        match self.quantities.resolve(&record.quantity_id) {
            Some(quantity) => {
                quantity.apply(item, record.value);
                stats.records_applied += 1;
            }
            None => {
                stats.records_unknown += 1;
                *stats
                    .unknown_quantities
                    .entry(record.quantity_id.clone())
                    .or_insert(0) += 1;

                debug!(
                    quantity = %record.quantity_id,
                    latitude = record.latitude,
                    longitude = record.longitude,
                    "Skipping record with unknown quantity"
                );
            }
        }
    }
}

impl Default for ForecastAggregator {
    fn default() -> Self {
        Self::new()
    }
}
