// libs/appointment-cell/src/services/slot_grid.rs
use chrono::{NaiveTime, Timelike};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotGridError {
    #[error("Business hours need at least one open interval")]
    NoIntervals,

    #[error("Open interval {start}-{end} is empty")]
    EmptyInterval { start: NaiveTime, end: NaiveTime },

    #[error("Open intervals must be ordered and must not overlap")]
    OverlappingIntervals,

    #[error("Slot granularity must be a positive number of minutes")]
    ZeroGranularity,

    #[error("Slot granularity of {minutes} minutes does not fit in any open interval")]
    GranularityTooLong { minutes: u32 },
}

/// A contiguous stretch of opening hours, end-exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl OpenInterval {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    fn hm(start: (u32, u32), end: (u32, u32)) -> Self {
        Self {
            start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessHours {
    pub intervals: Vec<OpenInterval>,
    pub granularity_minutes: u32,
}

impl Default for BusinessHours {
    /// 09:00-12:00 and 14:00-18:00 in 30 minute steps.
    fn default() -> Self {
        Self {
            intervals: vec![
                OpenInterval::hm((9, 0), (12, 0)),
                OpenInterval::hm((14, 0), (18, 0)),
            ],
            granularity_minutes: 30,
        }
    }
}

impl BusinessHours {
    fn validate(&self) -> Result<(), SlotGridError> {
        if self.granularity_minutes == 0 {
            return Err(SlotGridError::ZeroGranularity);
        }
        if self.intervals.is_empty() {
            return Err(SlotGridError::NoIntervals);
        }
        for interval in &self.intervals {
            if interval.start >= interval.end {
                return Err(SlotGridError::EmptyInterval {
                    start: interval.start,
                    end: interval.end,
                });
            }
        }
        if self.intervals.windows(2).any(|pair| pair[0].end > pair[1].start) {
            return Err(SlotGridError::OverlappingIntervals);
        }
        let longest = self
            .intervals
            .iter()
            .map(|i| minutes_of_day(i.end) - minutes_of_day(i.start))
            .max()
            .unwrap_or(0);
        if self.granularity_minutes > longest {
            return Err(SlotGridError::GranularityTooLong {
                minutes: self.granularity_minutes,
            });
        }
        Ok(())
    }
}

/// The canonical, ordered set of bookable slot labels (`HH:MM`) for a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGrid {
    hours: BusinessHours,
    labels: Vec<String>,
}

impl SlotGrid {
    pub fn new(hours: BusinessHours) -> Result<Self, SlotGridError> {
        hours.validate()?;
        let labels = build_labels(&hours);
        Ok(Self { hours, labels })
    }

    pub fn standard() -> Self {
        let hours = BusinessHours::default();
        let labels = build_labels(&hours);
        Self { hours, labels }
    }

    /// Ordered slot labels. Identical on every call.
    pub fn generate(&self) -> Vec<String> {
        self.labels.clone()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn contains(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    /// Index of `label` in canonical order.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn business_hours(&self) -> &BusinessHours {
        &self.hours
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self::standard()
    }
}

fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

fn build_labels(hours: &BusinessHours) -> Vec<String> {
    let step = hours.granularity_minutes;
    let mut labels = Vec::new();

    for interval in &hours.intervals {
        let end = minutes_of_day(interval.end);
        let mut current = minutes_of_day(interval.start);
        while let Some(next) = current.checked_add(step).filter(|next| *next <= end) {
            labels.push(format!("{:02}:{:02}", current / 60, current % 60));
            current = next;
        }
    }

    labels
}
