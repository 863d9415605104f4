//! Field readers that record violations while extracting typed values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use super::violation::{Rule, ValidationFailure, Violation};

/// Largest integer a double represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

type Object = Map<String, Value>;

/// Whether a field must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Presence {
    Required,
    Optional,
}

/// Walks a decoded message and collects violations.
///
/// Every reader returns `None` when the value is absent or invalid; an invalid or
/// missing required value always records a violation, so a `None` for a required
/// field implies [`SchemaReader::finish`] fails.
#[derive(Debug, Default)]
pub(crate) struct SchemaReader {
    violations: Vec<Violation>,
}

impl SchemaReader {
    pub fn new() -> Self {
        Self::default()
    }

    fn report(&mut self, path: &str, rule: Rule) {
        self.violations.push(Violation::new(path, rule));
    }

    /// Look up a field, reporting it when required and absent.
    fn lookup<'v>(&mut self, parent: &'v Object, path: &str, presence: Presence) -> Option<&'v Value> {
        let key = path.rsplit('.').next().unwrap_or(path);
        let value = parent.get(key);
        if value.is_none() && presence == Presence::Required {
            self.report(path, Rule::Required);
        }
        value
    }

    /// The message itself must be an object.
    pub fn root<'v>(&mut self, value: &'v Value) -> Option<&'v Object> {
        let object = value.as_object();
        if object.is_none() {
            self.report("", Rule::Object);
        }
        object
    }

    pub fn object<'v>(&mut self, parent: &'v Object, path: &str) -> Option<&'v Object> {
        let value = self.lookup(parent, path, Presence::Required)?;
        let object = value.as_object();
        if object.is_none() {
            self.report(path, Rule::Object);
        }
        object
    }

    pub fn string(&mut self, parent: &Object, path: &str) -> Option<String> {
        match self.lookup(parent, path, Presence::Required)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.report(path, Rule::String);
                None
            }
        }
    }

    /// A required string that must equal `expected`.
    pub fn literal(&mut self, parent: &Object, path: &str, expected: &'static str) -> bool {
        match self.string(parent, path) {
            Some(actual) if actual == expected => true,
            Some(_) => {
                self.report(path, Rule::OneOf(expected));
                false
            }
            None => false,
        }
    }

    pub fn timestamp(&mut self, parent: &Object, path: &str) -> Option<DateTime<Utc>> {
        let value = self.lookup(parent, path, Presence::Required)?;
        let parsed = parse_timestamp(value);
        if parsed.is_none() {
            self.report(path, Rule::Date);
        }
        parsed
    }

    /// An integer that must be at least `min`.
    pub fn integer(
        &mut self,
        parent: &Object,
        path: &str,
        min: u64,
        presence: Presence,
    ) -> Option<u64> {
        let value = self.lookup(parent, path, presence)?;
        let Some(number) = to_number(value) else {
            self.report(path, Rule::Number);
            return None;
        };
        if number.fract() != 0.0 {
            self.report(path, Rule::Integer);
            return None;
        }
        if number.abs() > MAX_SAFE_INTEGER {
            self.report(path, Rule::SafeNumber);
            return None;
        }
        // Safe range and integral, so the conversion is exact.
        let integer = number as i64;
        if integer < min as i64 {
            self.report(path, Rule::Min(min));
            return None;
        }
        u64::try_from(integer).ok()
    }

    pub fn boolean(&mut self, parent: &Object, path: &str, presence: Presence) -> Option<bool> {
        let value = self.lookup(parent, path, presence)?;
        let parsed = to_boolean(value);
        if parsed.is_none() {
            self.report(path, Rule::Boolean);
        }
        parsed
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn into_failure(self) -> ValidationFailure {
        ValidationFailure::new(self.violations)
    }
}

/// Numbers, or strings holding a finite number.
fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}

fn to_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

/// Epoch milliseconds, RFC 3339, ISO local date-time or a bare date.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => from_millis(n.as_f64()?),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(millis) = s.parse::<f64>() {
                return from_millis(millis);
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(dt) = s.parse::<NaiveDateTime>() {
                return Some(dt.and_utc());
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt.and_utc());
            }
            s.parse::<NaiveDate>()
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        }
        _ => None,
    }
}

fn from_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() || millis.abs() > MAX_SAFE_INTEGER {
        return None;
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64)
}
