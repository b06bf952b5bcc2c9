use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderSeverity {
    Safe,
    Upcoming,
    Warning,
    Attention,
    Critical,
    Expired,
}

impl ReminderSeverity {
    /// Numeric rank, most severe highest. Earlier deadlines must never rank
    /// lower than later ones.
    pub fn rank(self) -> u8 {
        match self {
            Self::Safe => 0,
            Self::Upcoming => 1,
            Self::Warning => 2,
            Self::Attention => 3,
            Self::Critical => 4,
            Self::Expired => 5,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ThresholdError {
    #[error("threshold table requires at least one bucket")]
    EmptyTable,
    #[error("bucket bound must be non-negative, found {max_days}")]
    NegativeBound { max_days: i64 },
    #[error("bucket bounds must be strictly ascending ({previous} then {current})")]
    NonAscendingBound { previous: i64, current: i64 },
    #[error("bucket severity must not increase with the bound ({previous:?} then {current:?})")]
    SeverityNotMonotonic { previous: ReminderSeverity, current: ReminderSeverity },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ReminderError {
    #[error("could not parse `{raw}` as an ISO date (expected YYYY-MM-DD)")]
    InvalidDate { raw: String },
    #[error(transparent)]
    Threshold(#[from] ThresholdError),
}

/// One severity bucket: day-counts up to and including `max_days` fall here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderBucket {
    pub max_days: i64,
    pub severity: ReminderSeverity,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub severity: ReminderSeverity,
    pub label: String,
    pub days_remaining: i64,
}

impl Classification {
    pub fn severity_rank(&self) -> u8 {
        self.severity.rank()
    }
}

/// Ordered bucket table evaluated top to bottom, first match wins. Negative
/// day-counts are always Expired; counts beyond the last bound are Safe.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdTable {
    buckets: Vec<ReminderBucket>,
    expired_label: String,
    safe_label: String,
}

const EXPIRED_LABEL: &str = "Renew Immediately";
const SAFE_LABEL: &str = "Valid Long-Term";

impl ThresholdTable {
    pub fn new(buckets: Vec<ReminderBucket>) -> Result<Self, ThresholdError> {
        Self::with_labels(buckets, EXPIRED_LABEL, SAFE_LABEL)
    }

    pub fn with_labels(
        buckets: Vec<ReminderBucket>,
        expired_label: impl Into<String>,
        safe_label: impl Into<String>,
    ) -> Result<Self, ThresholdError> {
        if buckets.is_empty() {
            return Err(ThresholdError::EmptyTable);
        }
        for bucket in &buckets {
            if bucket.max_days < 0 {
                return Err(ThresholdError::NegativeBound { max_days: bucket.max_days });
            }
        }
        for pair in buckets.windows(2) {
            if pair[1].max_days <= pair[0].max_days {
                return Err(ThresholdError::NonAscendingBound {
                    previous: pair[0].max_days,
                    current: pair[1].max_days,
                });
            }
            if pair[1].severity.rank() > pair[0].severity.rank() {
                return Err(ThresholdError::SeverityNotMonotonic {
                    previous: pair[0].severity,
                    current: pair[1].severity,
                });
            }
        }

        Ok(Self {
            buckets,
            expired_label: expired_label.into(),
            safe_label: safe_label.into(),
        })
    }

    /// Fine 6-bucket table used for legal-document compliance reminders.
    pub fn fine() -> Self {
        Self {
            buckets: vec![
                bucket(30, ReminderSeverity::Critical, "< 1 Month"),
                bucket(60, ReminderSeverity::Attention, "< 2 Months"),
                bucket(90, ReminderSeverity::Warning, "< 3 Months"),
                bucket(180, ReminderSeverity::Upcoming, "< 6 Months"),
            ],
            expired_label: EXPIRED_LABEL.to_string(),
            safe_label: SAFE_LABEL.to_string(),
        }
    }

    /// Coarse 3-bucket table used for SLA badges.
    pub fn coarse() -> Self {
        Self {
            buckets: vec![
                bucket(30, ReminderSeverity::Critical, "Urgent"),
                bucket(90, ReminderSeverity::Warning, "Warning"),
            ],
            expired_label: "Overdue".to_string(),
            safe_label: "On Track".to_string(),
        }
    }

    pub fn buckets(&self) -> &[ReminderBucket] {
        &self.buckets
    }

    pub fn expired_label(&self) -> &str {
        &self.expired_label
    }

    pub fn safe_label(&self) -> &str {
        &self.safe_label
    }

    pub fn classify(&self, days_remaining: i64) -> Classification {
        if days_remaining < 0 {
            return Classification {
                severity: ReminderSeverity::Expired,
                label: self.expired_label.clone(),
                days_remaining,
            };
        }

        for bucket in &self.buckets {
            if days_remaining <= bucket.max_days {
                return Classification {
                    severity: bucket.severity,
                    label: bucket.label.clone(),
                    days_remaining,
                };
            }
        }

        Classification {
            severity: ReminderSeverity::Safe,
            label: self.safe_label.clone(),
            days_remaining,
        }
    }

    pub fn classify_date(&self, target: NaiveDate, today: NaiveDate) -> Classification {
        self.classify(days_until(target, today))
    }
}

fn bucket(max_days: i64, severity: ReminderSeverity, label: &str) -> ReminderBucket {
    ReminderBucket { max_days, severity, label: label.to_string() }
}

/// Calendar-day difference between two dates. Negative when the target is in
/// the past.
pub fn days_until(target: NaiveDate, today: NaiveDate) -> i64 {
    (target - today).num_days()
}

/// Day-counts are calendar-day differences: both instants are truncated to
/// their UTC date before subtracting, so time-of-day components never shift
/// the count.
pub fn days_until_instant(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    days_until(target.date_naive(), now.date_naive())
}

pub fn parse_iso_date(raw: &str) -> Result<NaiveDate, ReminderError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ReminderError::InvalidDate { raw: raw.to_owned() })
}
