use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reducer applied to the raw samples of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum AggrMethod {
    /// Number of samples.
    Count,
    /// Sum of sample values.
    Sum,
    /// Arithmetic mean of sample values.
    Avg,
    /// Minimum sample value.
    Min,
    /// Maximum sample value.
    Max,
}

/// Bucket width over which an [`AggrMethod`] is applied.
///
/// Without a period, the reducer collapses the whole requested time range
/// into a single value per attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum AggrPeriod {
    /// Calendar-year buckets.
    Year,
    /// Calendar-month buckets.
    Month,
    /// Calendar-day buckets.
    Day,
    /// One-hour buckets.
    Hour,
    /// One-minute buckets.
    Minute,
    /// One-second buckets.
    Second,
}

/// Whether aggregation reduces each entity separately or across entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum AggrScope {
    /// Reduce the samples of each entity on its own.
    Entity,
    /// Reduce across all matching entities.
    Global,
}

/// Output toggles accepted in the `options` parameter.
///
/// The parameter is a comma-separated list; every token must name one of
/// these. Unknown tokens are rejected rather than ignored, so a typo cannot
/// silently change the meaning of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum OutputOption {
    /// Ask the translator to also report the total number of matching rows.
    Count,
}

impl OutputOption {
    /// Parse the comma-separated `options` parameter.
    ///
    /// Empty tokens are dropped; unknown tokens are an error.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, AggregateError> {
        raw.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for AggrMethod {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count" => Ok(Self::Count),
            "sum" => Ok(Self::Sum),
            "avg" => Ok(Self::Avg),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            other => Err(AggregateError::UnknownMethod(other.to_owned())),
        }
    }
}

impl FromStr for AggrPeriod {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "year" => Ok(Self::Year),
            "month" => Ok(Self::Month),
            "day" => Ok(Self::Day),
            "hour" => Ok(Self::Hour),
            "minute" => Ok(Self::Minute),
            "second" => Ok(Self::Second),
            other => Err(AggregateError::UnknownPeriod(other.to_owned())),
        }
    }
}

impl FromStr for AggrScope {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entity" => Ok(Self::Entity),
            "global" => Ok(Self::Global),
            other => Err(AggregateError::UnknownScope(other.to_owned())),
        }
    }
}

impl FromStr for OutputOption {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count" => Ok(Self::Count),
            other => Err(AggregateError::UnknownOption(other.to_owned())),
        }
    }
}

impl fmt::Display for AggrMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Min => "min",
            Self::Max => "max",
        };
        f.write_str(name)
    }
}

/// Errors raised while validating the aggregation parameters.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    /// A bucket width has no meaning without a reducer.
    #[error("aggrMethod is compulsory when using aggrPeriod")]
    PeriodWithoutMethod,
    /// The `aggrMethod` token names no supported reducer.
    #[error("unknown aggregation method: {0}")]
    UnknownMethod(String),
    /// The `aggrPeriod` token names no supported bucket width.
    #[error("unknown aggregation period: {0}")]
    UnknownPeriod(String),
    /// The `aggrScope` token names no supported scope.
    #[error("unknown aggregation scope: {0}")]
    UnknownScope(String),
    /// An `options` token names no supported output toggle.
    #[error("unknown option: {0}")]
    UnknownOption(String),
}
