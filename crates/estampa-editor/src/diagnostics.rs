//! Per-request diagnostics: operation label, generation, and wall time.
//!
//! Permanent instrumentation for the processing round-trip (request
//! built → result accepted). Timestamps are captured via the
//! `web-time` crate, which uses `performance.now()` on WASM and
//! `std::time::Instant` on native; durations are serialized as
//! fractional seconds for JSON compatibility.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use web_time::Instant;

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics for one completed processing round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDiagnostics {
    /// Operation label (the editing mode's route segment).
    pub operation: String,
    /// Session generation the request was issued at.
    pub generation: u64,
    /// Wall time from request build to result acceptance.
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

/// Running timer for one processing round-trip.
#[derive(Debug, Clone)]
pub struct OperationTimer {
    operation: String,
    generation: u64,
    started: Instant,
}

impl OperationTimer {
    /// Start timing an operation.
    #[must_use]
    pub fn start(operation: impl Into<String>, generation: u64) -> Self {
        Self {
            operation: operation.into(),
            generation,
            started: Instant::now(),
        }
    }

    /// Generation the timed request was issued at.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Stop the timer and produce diagnostics.
    #[must_use]
    pub fn finish(self) -> OperationDiagnostics {
        OperationDiagnostics {
            operation: self.operation,
            generation: self.generation,
            duration: self.started.elapsed(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn timer_records_operation_and_generation() {
        let timer = OperationTimer::start("remove-bg", 7);
        assert_eq!(timer.generation(), 7);
        let diag = timer.finish();
        assert_eq!(diag.operation, "remove-bg");
        assert_eq!(diag.generation, 7);
    }

    #[test]
    fn elapsed_duration_is_monotonic() {
        let timer = OperationTimer::start("upscale", 0);
        let diag = timer.finish();
        assert!(diag.duration >= Duration::ZERO);
    }

    #[test]
    fn diagnostics_serde_round_trip() {
        let diag = OperationDiagnostics {
            operation: "halftone".to_string(),
            generation: 3,
            duration: Duration::from_millis(1250),
        };
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("1.25"), "duration serializes as seconds: {json}");
        let back: OperationDiagnostics = serde_json::from_str(&json).unwrap();
        assert_eq!(diag, back);
    }

    #[test]
    fn negative_duration_seconds_fail_to_deserialize() {
        let err = serde_json::from_str::<OperationDiagnostics>(
            r#"{"operation":"crop","generation":0,"duration":-1.0}"#,
        );
        assert!(err.is_err());
    }
}
