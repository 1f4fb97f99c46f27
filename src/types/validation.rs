use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A min/max bound on a validation rule.
///
/// Numeric for counts, lengths and number fields; date fields may carry
/// either an epoch-millisecond number or an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Limit {
    Number(f64),
    Text(String),
}

impl Limit {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Limit::Number(n) => Some(*n),
            Limit::Text(_) => None,
        }
    }

    /// Interpret the bound as a point in time: numbers are epoch
    /// milliseconds, strings are parsed as ISO-8601.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Limit::Number(ms) => Utc.timestamp_millis_opt(*ms as i64).single(),
            Limit::Text(text) => parse_iso_datetime(text),
        }
    }
}

/// Parse an ISO-8601 date or datetime, with or without offset.
pub(crate) fn parse_iso_datetime(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}

/// The validation rules attached to a field. Which rules apply depends on
/// the field type; unknown combinations are simply inert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationRules {
    pub required: bool,
    pub enforce_min_max: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Limit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Limit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex_error: Option<String>,
    /// Display-only unit hint for the authoring UI ("tags", "length", ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl ValidationRules {
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    /// The min bound as a positive count, when one is set.
    pub fn min_count(&self) -> Option<usize> {
        positive_count(self.min.as_ref())
    }

    /// The max bound as a positive count, when one is set.
    pub fn max_count(&self) -> Option<usize> {
        positive_count(self.max.as_ref())
    }

    pub fn min_number(&self) -> Option<f64> {
        self.min.as_ref().and_then(Limit::as_f64)
    }

    pub fn max_number(&self) -> Option<f64> {
        self.max.as_ref().and_then(Limit::as_f64)
    }

    pub fn min_datetime(&self) -> Option<DateTime<Utc>> {
        self.min.as_ref().and_then(Limit::as_datetime)
    }

    pub fn max_datetime(&self) -> Option<DateTime<Utc>> {
        self.max.as_ref().and_then(Limit::as_datetime)
    }
}

fn positive_count(limit: Option<&Limit>) -> Option<usize> {
    let n = limit?.as_f64()?;
    if n >= 1.0 {
        Some(n as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_parses_untagged() {
        let rules: ValidationRules =
            serde_json::from_str(r#"{"min": 2, "max": "2024-12-31", "required": true}"#).unwrap();
        assert_eq!(rules.min, Some(Limit::Number(2.0)));
        assert_eq!(rules.max, Some(Limit::Text("2024-12-31".into())));
        assert!(rules.required);
    }

    #[test]
    fn limit_as_datetime_accepts_both_representations() {
        let from_ms = Limit::Number(946_684_800_000.0);
        assert_eq!(
            from_ms.as_datetime().unwrap(),
            Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
        );
        let from_iso = Limit::Text("2000-01-01T00:00:00Z".into());
        assert_eq!(from_iso.as_datetime(), from_ms.as_datetime());
        let date_only = Limit::Text("2000-01-01".into());
        assert_eq!(date_only.as_datetime(), from_ms.as_datetime());
    }

    #[test]
    fn counts_ignore_zero_and_non_numeric_bounds() {
        let rules = ValidationRules {
            min: Some(Limit::Number(0.0)),
            max: Some(Limit::Text("not a number".into())),
            ..Default::default()
        };
        assert_eq!(rules.min_count(), None);
        assert_eq!(rules.max_count(), None);
    }

    #[test]
    fn unknown_rule_keys_are_tolerated() {
        // legacy schema files carry extra hints such as `isString`
        let rules: ValidationRules =
            serde_json::from_str(r#"{"min": null, "isString": true, "unit": "date"}"#).unwrap();
        assert_eq!(rules.min, None);
        assert_eq!(rules.unit.as_deref(), Some("date"));
    }
}
