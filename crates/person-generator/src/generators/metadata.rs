//! Metadata generator: employment dates, status and last update.

use super::{pick, DEPARTMENTS};
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use rand::Rng;
use serde_json::{json, Map, Value};

const STATUSES: &[&str] = &["active", "inactive", "pending"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Pick a date uniformly in `[start, end]`.
fn date_between<R: Rng>(rng: &mut R, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let span = (end - start).num_days().max(0) as u64;
    start
        .checked_add_days(Days::new(rng.random_range(0..=span)))
        .unwrap_or(start)
}

/// Generate metadata relative to `now`.
///
/// Half of the records describe an employee (join date within the last ten
/// years plus a department); the rest describe a contractor whose contract
/// started within the last year and ends no later than a year from now.
pub fn generate_metadata<R: Rng>(rng: &mut R, now: NaiveDateTime) -> Value {
    let today = now.date();
    let mut metadata = Map::new();

    if rng.random_bool(0.5) {
        let earliest = today.checked_sub_days(Days::new(3650)).unwrap_or(today);
        let join_date = date_between(rng, earliest, today);
        metadata.insert(
            "joinDate".into(),
            json!(join_date.format(DATE_FORMAT).to_string()),
        );
        metadata.insert("department".into(), json!(pick(rng, DEPARTMENTS)));
    } else {
        let earliest = today.checked_sub_days(Days::new(365)).unwrap_or(today);
        let latest = today.checked_add_days(Days::new(365)).unwrap_or(today);
        let start = date_between(rng, earliest, today);
        let end = date_between(rng, start, latest);
        metadata.insert(
            "contractStart".into(),
            json!(start.format(DATE_FORMAT).to_string()),
        );
        metadata.insert(
            "contractEnd".into(),
            json!(end.format(DATE_FORMAT).to_string()),
        );
    }

    if rng.random_bool(0.3) {
        metadata.insert("status".into(), json!(pick(rng, STATUSES)));
    }

    if rng.random_bool(0.2) {
        let year_start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
        let day = date_between(rng, year_start, today);
        let seconds = rng.random_range(0..86_400u32);
        let updated = day
            .and_hms_opt(seconds / 3600, (seconds / 60) % 60, seconds % 60)
            .unwrap_or(now);
        metadata.insert(
            "lastUpdated".into(),
            json!(updated.format("%Y-%m-%d %H:%M:%S").to_string()),
        );
    }

    Value::Object(metadata)
}
