//! Error types for parsing floor plans and decoding evaluations.
//!
//! Parse-time errors ([`FloorPlanError`]) surface synchronously before
//! anything is rendered. Evaluation errors ([`EvaluationError`]) travel
//! alongside successful results through the same completion channel.

use std::error::Error as StdError;
use std::time::Duration;

use thiserror::Error;

use crate::zones::ZoneCategory;

#[derive(Debug, Error)]
pub enum FloorPlanError {
    /// Not JSON, or not an object mapping categories to rectangle arrays.
    #[error("malformed floor-plan document: {0}")]
    MalformedDocument(String),
    #[error("malformed rectangle #{index} in {category}: {reason}")]
    MalformedRectangle {
        category: ZoneCategory,
        index: usize,
        reason: String,
    },
    #[error("unknown zone category {0:?}")]
    UnknownCategory(String),
}

/// A metric field could not be normalized to a usable value.
#[derive(Debug, Error)]
pub enum MetricDecodeError {
    #[error("field `{field}`: {value:?} is not valid JSON after quote normalization")]
    Encoded {
        field: &'static str,
        value: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("field `{field}`: {value:?} is not a number")]
    Scalar { field: &'static str, value: String },
    #[error("field `{field}`: entry {key:?} is not a number")]
    Entry { field: &'static str, key: String },
}

#[derive(Debug, Error)]
pub enum EvaluationError {
    /// The request never produced a response (connection refused, DNS, ...).
    #[error("request to scorer failed: {0}")]
    Network(#[source] Box<dyn StdError + Send + Sync>),
    #[error("scorer responded with HTTP {status}")]
    Status { status: u16 },
    /// The body was not a JSON object with the expected fields.
    #[error("scorer response has unexpected shape: {reason}")]
    Shape { reason: String },
    #[error(transparent)]
    Decode(#[from] MetricDecodeError),
    #[error("no response from scorer within {}s", .after.as_secs_f64())]
    Timeout { after: Duration },
    /// The evaluation task ended without producing a result.
    #[error("evaluation aborted before the scorer replied")]
    Aborted,
}

impl EvaluationError {
    pub fn network<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Network(Box::new(err))
    }

    pub fn shape(reason: impl Into<String>) -> Self {
        Self::Shape {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = FloorPlanError::UnknownCategory("LOBBY".into());
        assert_eq!(err.to_string(), "unknown zone category \"LOBBY\"");

        let err = FloorPlanError::MalformedRectangle {
            category: ZoneCategory::Work,
            index: 2,
            reason: "expected 4 coordinates, found 3".into(),
        };
        assert_eq!(
            err.to_string(),
            "malformed rectangle #2 in WORK: expected 4 coordinates, found 3"
        );
    }

    #[test]
    fn test_timeout_message() {
        let err = EvaluationError::Timeout {
            after: Duration::from_secs(10),
        };
        assert_eq!(err.to_string(), "no response from scorer within 10s");
    }

    #[test]
    fn test_decode_error_is_transparent() {
        let inner = MetricDecodeError::Scalar {
            field: "total_area",
            value: "lots".into(),
        };
        let msg = inner.to_string();
        let err = EvaluationError::from(inner);
        assert_eq!(err.to_string(), msg);
    }
}
