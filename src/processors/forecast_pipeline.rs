use crate::error::Result;
use crate::models::Forecast;
use crate::processors::{AggregationStats, ParallelAggregator, RecordFilter};
use crate::readers::{InputFormat, InputReader};
use crate::settings::Settings;
use crate::utils::progress::ProgressReporter;
use std::path::Path;
use tracing::info;

/// Decode, filter and aggregate one input file
pub struct ForecastPipeline {
    reader: InputReader,
    filter: RecordFilter,
    aggregator: ParallelAggregator,
}

impl ForecastPipeline {
    pub fn new(aggregator: ParallelAggregator) -> Self {
        Self {
            reader: InputReader::new(),
            filter: RecordFilter::new(),
            aggregator,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let aggregator = ParallelAggregator::new(settings.aggregation.workers)
            .with_parallel_threshold(settings.aggregation.parallel_threshold)
            .with_quantities(settings.quantity_table());

        Self::new(aggregator)
    }

    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.reader = InputReader::with_mmap(use_mmap);
        self
    }

    pub fn run(
        &self,
        path: &Path,
        format: InputFormat,
        progress: Option<&ProgressReporter>,
    ) -> Result<(Forecast, AggregationStats)> {
        if let Some(p) = progress {
            p.set_message("Decoding grid records...");
        }

        let decoder = format.decoder();
        let records = self.reader.decode_file(path, decoder.as_ref())?;
        info!(records = records.len(), decoder = decoder.name(), "Decoded grid records");

        let (records, filtered) = self.filter.apply(records);

        if let Some(p) = progress {
            p.set_message("Aggregating forecasts...");
        }

        let (forecast, mut stats) = self.aggregator.aggregate(&records, progress)?;
        stats.records_filtered = filtered;

        info!(
            locations = forecast.location_count(),
            items = forecast.item_count(),
            unknown = stats.records_unknown,
            "Aggregated forecast"
        );

        Ok((forecast, stats))
    }
}
