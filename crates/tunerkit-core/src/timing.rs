//! Wall-clock timing capture around intercepted calls

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A wall-clock instant split into integer seconds and millisecond remainder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePoint {
    pub seconds: i64,
    pub milliseconds: u32,
}

impl TimePoint {
    /// Capture the current wall-clock instant
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            seconds: now.timestamp(),
            milliseconds: now.timestamp_subsec_millis(),
        }
    }
}

/// Start and end instants spanning one intercepted call.
///
/// Both endpoints are captured even for instantaneous events (simulated
/// responses, session boundaries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingRecord {
    pub start_time: TimePoint,
    pub end_time: TimePoint,
}

impl TimingRecord {
    /// A record with both endpoints at the current instant
    pub fn instant() -> Self {
        let point = TimePoint::now();
        Self {
            start_time: point,
            end_time: point,
        }
    }
}

/// Measures one invocation from just before the simulation gate until the
/// result is fully normalized
#[derive(Debug, Clone, Copy)]
pub struct CallTimer {
    start: TimePoint,
}

impl CallTimer {
    pub fn start() -> Self {
        Self {
            start: TimePoint::now(),
        }
    }

    pub fn finish(self) -> TimingRecord {
        TimingRecord {
            start_time: self.start,
            end_time: TimePoint::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millisecond_remainder_is_sub_second() {
        let point = TimePoint::now();
        assert!(point.milliseconds < 1000);
        assert!(point.seconds > 0);
    }

    #[test]
    fn instant_record_has_equal_endpoints() {
        let record = TimingRecord::instant();
        assert_eq!(record.start_time, record.end_time);
    }

    #[test]
    fn finish_never_precedes_start() {
        let timer = CallTimer::start();
        let record = timer.finish();
        assert!(
            record.end_time.seconds > record.start_time.seconds
                || (record.end_time.seconds == record.start_time.seconds
                    && record.end_time.milliseconds >= record.start_time.milliseconds)
        );
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let record = TimingRecord::instant();
        let json = serde_json::to_value(record).unwrap();
        assert!(json.get("startTime").is_some());
        assert!(json.get("endTime").is_some());
        assert!(json["startTime"].get("seconds").is_some());
        assert!(json["startTime"].get("milliseconds").is_some());
    }
}
