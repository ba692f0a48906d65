// osfab - os/time.rs
//
// File timestamps and the clock queries the interpreter core uses.
// Timezone setup needs no work on this host and has no counterpart here.

use chrono::{DateTime, Local, Utc};
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// A point in time associated with a file.
///
/// Ordered, so staleness checks are plain comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileTime(SystemTime);

impl FileTime {
    /// Wrap a host time value.
    pub fn from_system_time(t: SystemTime) -> Self {
        Self(t)
    }

    /// The underlying host time value.
    pub fn system_time(self) -> SystemTime {
        self.0
    }

    /// The timestamp in UTC, or `None` if the host value lies outside the
    /// range chrono can represent.
    pub fn to_utc(self) -> Option<DateTime<Utc>> {
        let (secs, nanos) = match self.0.duration_since(UNIX_EPOCH) {
            Ok(after) => (i64::try_from(after.as_secs()).ok()?, after.subsec_nanos()),
            Err(e) => {
                let before = e.duration();
                let secs = i64::try_from(before.as_secs()).ok()?.checked_neg()?;
                match before.subsec_nanos() {
                    0 => (secs, 0),
                    n => (secs.checked_sub(1)?, 1_000_000_000 - n),
                }
            }
        };
        DateTime::from_timestamp(secs, nanos)
    }

    /// The timestamp in the host's local timezone.
    pub fn to_local(self) -> Option<DateTime<Local>> {
        self.to_utc().map(|t| t.with_timezone(&Local))
    }

    /// Seconds since the Unix epoch; negative for times before it.
    pub fn unix_secs(self) -> Option<i64> {
        self.to_utc().map(|t| t.timestamp())
    }
}

impl From<SystemTime> for FileTime {
    fn from(t: SystemTime) -> Self {
        Self(t)
    }
}

impl Serialize for FileTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_utc() {
            Some(t) => t.serialize(serializer),
            None => Err(S::Error::custom("file time out of range")),
        }
    }
}

/// Modification time of `path`, following symbolic links.
pub fn modified_time(path: impl AsRef<Path>) -> Option<FileTime> {
    std::fs::metadata(path.as_ref())
        .and_then(|m| m.modified())
        .ok()
        .map(FileTime)
}

/// Current time in seconds since the Unix epoch.
pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// Current time in milliseconds since the Unix epoch.
///
/// Only differences between two readings are meaningful to the caller.
pub fn sys_clock_ms() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_millis()).unwrap_or(i64::MAX),
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_file_times_order_chronologically() {
        let earlier = FileTime::from(UNIX_EPOCH + Duration::from_secs(100));
        let later = FileTime::from(UNIX_EPOCH + Duration::from_secs(200));
        assert!(earlier < later);
        assert_eq!(earlier.unix_secs(), Some(100));
    }

    #[test]
    fn test_time_before_epoch_is_negative() {
        let t = FileTime::from(UNIX_EPOCH - Duration::from_millis(1500));
        assert_eq!(t.unix_secs(), Some(-2));
        assert_eq!(t.to_utc().unwrap().timestamp_subsec_millis(), 500);
    }

    #[cfg(unix)]
    #[test]
    fn test_out_of_range_time_does_not_panic() {
        let far = FileTime::from(UNIX_EPOCH + Duration::from_secs(1 << 50));
        assert!(far.to_utc().is_none());
        assert!(far.to_local().is_none());
        assert!(far.unix_secs().is_none());
        assert!(serde_json::to_string(&far).is_err());
    }

    #[test]
    fn test_serialises_as_rfc3339() {
        let t = FileTime::from(UNIX_EPOCH + Duration::from_secs(86_400));
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"1970-01-02T00:00:00Z\"");
    }

    #[test]
    fn test_modified_time_of_missing_path_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(modified_time(dir.path().join("nope")).is_none());
        assert!(modified_time(dir.path()).is_some());
    }

    #[test]
    fn test_clock_is_monotonic_enough() {
        let a = sys_clock_ms();
        let b = sys_clock_ms();
        assert!(b >= a);
        assert!(now() > 1_600_000_000);
    }
}
