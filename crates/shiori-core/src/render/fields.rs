//! Display values derived from a record's raw fields.

use shiori_api::{FuzzyDate, StudioCredit};

pub const UNKNOWN: &str = "Unknown";

/// The studio flagged as main producer, or "Unknown".
pub fn main_studio(studios: &[StudioCredit]) -> &str {
    studios
        .iter()
        .find(|s| s.is_main)
        .map(|s| s.name.as_str())
        .unwrap_or(UNKNOWN)
}

/// `YYYY-MM-DD`, `YYYY-MM` or `YYYY` depending on how much of the date is known.
pub fn format_release_date(date: Option<&FuzzyDate>) -> String {
    match date {
        Some(FuzzyDate {
            year: Some(y),
            month: Some(m),
            day: Some(d),
        }) => format!("{y:04}-{m:02}-{d:02}"),
        Some(FuzzyDate {
            year: Some(y),
            month: Some(m),
            day: None,
        }) => format!("{y:04}-{m:02}"),
        Some(FuzzyDate { year: Some(y), .. }) => format!("{y:04}"),
        _ => UNKNOWN.to_string(),
    }
}

/// "Fall 2023", "Fall", "2023" or "Unknown".
pub fn format_season(season: Option<&str>, year: Option<u32>) -> String {
    let season = season.map(capitalize_season).unwrap_or_default();
    let year = year.map(|y| y.to_string()).unwrap_or_default();
    let joined = format!("{season} {year}");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        UNKNOWN.to_string()
    } else {
        trimmed.to_string()
    }
}

fn capitalize_season(s: &str) -> String {
    match s {
        "WINTER" => "Winter".into(),
        "SPRING" => "Spring".into(),
        "SUMMER" => "Summer".into(),
        "FALL" => "Fall".into(),
        other => capitalize(other),
    }
}

/// Total minutes for a series, if both counts are known.
pub fn watch_time(episodes: Option<u32>, duration: Option<u32>) -> Option<u64> {
    Some(u64::from(episodes?) * u64::from(duration?))
}

/// `LIGHT_NOVEL` → `Light Novel`; absent → "Unknown".
pub fn format_source(source: Option<&str>) -> String {
    match source {
        Some(s) if !s.trim().is_empty() => s
            .split('_')
            .filter(|w| !w.is_empty())
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" "),
        _ => UNKNOWN.to_string(),
    }
}

/// Render an optional count, falling back to "Unknown".
pub fn or_unknown<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn capitalize(word: &str) -> String {
    let mut c = word.chars();
    match c.next() {
        Some(first) => first.to_uppercase().to_string() + &c.as_str().to_lowercase(),
        None => String::new(),
    }
}
