pub mod forecast_aggregator;
pub mod forecast_pipeline;
pub mod parallel_aggregator;
pub mod record_filter;

pub use forecast_aggregator::{AggregationStats, ForecastAggregator};
pub use forecast_pipeline::ForecastPipeline;
pub use parallel_aggregator::ParallelAggregator;
pub use record_filter::RecordFilter;
