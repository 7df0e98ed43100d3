//! Timestamp helpers shared by the domain models.

use chrono::{DateTime, Utc};

/// Returns a refreshed `updated_at` value that never precedes `previous`.
///
/// The wall clock can step backwards; modification times must not.
pub fn advance(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous { now } else { previous }
}
