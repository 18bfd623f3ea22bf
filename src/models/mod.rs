pub mod forecast;
pub mod grid_record;
pub mod location;
pub mod quantity;

pub use forecast::{Forecast, ForecastItem, TimeSeries};
pub use grid_record::GridRecord;
pub use location::LocationKey;
pub use quantity::{Quantity, QuantityTable};
