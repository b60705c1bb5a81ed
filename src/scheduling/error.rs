// src/scheduling/error.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Erros de entrada do motor de escala (padrões, intervalos, documentos legados).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingError {
    #[error("invalid rotation pattern: {0}")]
    InvalidPattern(String),

    #[error("invalid date range: {start} is after {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("date range of {days} days exceeds the maximum of {max} days")]
    RangeTooLong { days: i64, max: i64 },

    #[error("date {0} is outside the supported calendar")]
    DateOutOfBounds(NaiveDate),

    #[error("invalid year {0}")]
    InvalidYear(i32),

    #[error("unknown rotation team '{0}'")]
    UnknownTeam(String),

    #[error("unknown assignment origin '{0}'")]
    UnknownOrigin(String),

    #[error("invalid shift duration {0} hours")]
    InvalidDuration(Decimal),

    #[error("invalid legacy document: {0}")]
    InvalidDocument(String),
}

pub type Result<T> = std::result::Result<T, SchedulingError>;
