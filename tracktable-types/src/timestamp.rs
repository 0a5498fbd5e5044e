//! Timestamp helpers on top of [`hifitime::Epoch`].
//!
//! Trajectory timestamps are instants with microsecond resolution. The
//! reference "zero" instant is the Unix epoch, which is also the base of
//! the wire representation used by the binary codec.

use hifitime::{Duration, Epoch};

/// The zero instant: 1970-01-01T00:00:00 UTC.
pub fn unix_epoch() -> Epoch {
    Epoch::from_gregorian_utc(1970, 1, 1, 0, 0, 0, 0)
}

/// Instant at `microseconds` after (or before, when negative) the zero
/// instant.
pub fn from_unix_microseconds(microseconds: i64) -> Epoch {
    unix_epoch() + Duration::from_total_nanoseconds(microseconds as i128 * 1_000)
}

/// Whole microseconds between the instant and the zero instant,
/// truncated toward zero.
pub fn to_unix_microseconds(epoch: Epoch) -> i64 {
    ((epoch - unix_epoch()).total_nanoseconds() / 1_000) as i64
}

/// Drops any sub-microsecond part of the instant.
pub fn truncate_to_microseconds(epoch: Epoch) -> Epoch {
    from_unix_microseconds(to_unix_microseconds(epoch))
}

/// ISO 8601 extended rendering, e.g. `2014-03-05T13:44:06` or
/// `2014-03-05T13:44:06.250000` when a fractional second is present.
pub fn format_iso8601(epoch: Epoch) -> String {
    let (y, m, d, hh, mm, ss, nanos) = epoch.to_gregorian_utc();
    let micros = nanos / 1_000;
    if micros == 0 {
        format!("{y:04}-{m:02}-{d:02}T{hh:02}:{mm:02}:{ss:02}")
    } else {
        format!("{y:04}-{m:02}-{d:02}T{hh:02}:{mm:02}:{ss:02}.{micros:06}")
    }
}

/// Compact `YYYYMMDDHHMMSS` rendering used inside derived trajectory ids.
pub fn format_compact(epoch: Epoch) -> String {
    let (y, m, d, hh, mm, ss, _) = epoch.to_gregorian_utc();
    format!("{y:04}{m:02}{d:02}{hh:02}{mm:02}{ss:02}")
}
