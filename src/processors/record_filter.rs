use crate::error::{ProcessingError, Result};
use crate::models::GridRecord;
use crate::utils::constants::TIMESTAMP_FORMAT;
use crate::utils::coordinates::{normalize_longitude, BoundingBox};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

/// Optional spatial and valid-time restriction applied before aggregation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    bbox: Option<BoundingBox>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Keep records valid at or after `start`
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    /// Keep records valid at or before `end`
    pub fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    /// Build from optional CLI strings
    pub fn from_args(bbox: Option<&str>, start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let mut filter = Self::new();

        if let Some(bbox) = bbox {
            filter = filter.with_bbox(BoundingBox::parse(bbox)?);
        }
        if let Some(start) = start {
            filter = filter.with_start(parse_timestamp(start)?);
        }
        if let Some(end) = end {
            filter = filter.with_end(parse_timestamp(end)?);
        }

        filter.validate()?;
        Ok(filter)
    }

    pub fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(ProcessingError::Config(format!(
                    "Start time {} is after end time {}",
                    start.format(TIMESTAMP_FORMAT),
                    end.format(TIMESTAMP_FORMAT)
                )));
            }
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.bbox.is_some() || self.start.is_some() || self.end.is_some()
    }

    pub fn matches(&self, record: &GridRecord) -> bool {
        if let Some(start) = self.start {
            if record.valid_time < start {
                return false;
            }
        }

        if let Some(end) = self.end {
            if record.valid_time > end {
                return false;
            }
        }

        match self.bbox {
            Some(bbox) => bbox.contains(record.latitude, normalize_longitude(record.longitude)),
            None => true,
        }
    }

    /// Drop non-matching records, returning the survivors and the number removed
    pub fn apply(&self, records: Vec<GridRecord>) -> (Vec<GridRecord>, usize) {
        if !self.is_active() {
            return (records, 0);
        }

        let before = records.len();
        let kept: Vec<GridRecord> = records.into_iter().filter(|r| self.matches(r)).collect();
        let removed = before - kept.len();

        debug!(kept = kept.len(), removed, "Applied record filter");
        (kept, removed)
    }
}

/// Parse a `YYYY-MM-DDTHH:MM:SSZ` timestamp
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)?;
    Ok(Utc.from_utc_datetime(&naive))
}
