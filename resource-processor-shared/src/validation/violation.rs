//! Violation and failure types produced by schema validation.

use std::fmt;
use thiserror::Error;

/// The rule a field broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// A required field is absent.
    Required,
    /// The discriminator holds a value other than the expected literal.
    OneOf(&'static str),
    /// Expected a JSON object.
    Object,
    /// Expected a string.
    String,
    /// Expected a number (or a numeric string).
    Number,
    /// Expected a boolean (or `"true"` / `"false"`).
    Boolean,
    /// Expected epoch milliseconds or a parseable date string.
    Date,
    /// Numeric but has a fractional part.
    Integer,
    /// Integral but outside the range exactly representable as a double.
    SafeNumber,
    /// Below the allowed minimum.
    Min(u64),
}

impl Rule {
    /// Reporting order. Lower values are reported first.
    fn priority(&self) -> u8 {
        match self {
            Rule::Required => 0,
            Rule::OneOf(_) => 1,
            Rule::Object | Rule::String | Rule::Number | Rule::Boolean | Rule::Date => 2,
            Rule::Integer | Rule::SafeNumber => 3,
            Rule::Min(_) => 4,
        }
    }
}

/// A single schema violation at a dotted field path such as `payload.data.challengeId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub rule: Rule,
}

impl Violation {
    pub fn new(path: impl Into<String>, rule: Rule) -> Self {
        Self {
            path: path.into(),
            rule,
        }
    }

    /// The last path segment, used as the field label in messages.
    pub fn field(&self) -> &str {
        match self.path.rsplit('.').next() {
            Some(field) if !field.is_empty() => field,
            _ => "value",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field();
        match &self.rule {
            Rule::Required => write!(f, "\"{field}\" is required"),
            Rule::OneOf(literal) => write!(f, "\"{field}\" must be one of [{literal}]"),
            Rule::Object => write!(f, "\"{field}\" must be an object"),
            Rule::String => write!(f, "\"{field}\" must be a string"),
            Rule::Number => write!(f, "\"{field}\" must be a number"),
            Rule::Boolean => write!(f, "\"{field}\" must be a boolean"),
            Rule::Date => write!(
                f,
                "\"{field}\" must be a number of milliseconds or valid date string"
            ),
            Rule::Integer => write!(f, "\"{field}\" must be an integer"),
            Rule::SafeNumber => write!(f, "\"{field}\" must be a safe number"),
            Rule::Min(min) => write!(f, "\"{field}\" must be larger than or equal to {min}"),
        }
    }
}

/// A message failed its schema.
///
/// Violations are kept in reporting order: missing fields first, then a wrong
/// discriminator, then primitive type errors, integer-ness and finally minimums.
/// Ties keep the order the fields were visited in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_messages(.violations))]
pub struct ValidationFailure {
    violations: Vec<Violation>,
}

impl ValidationFailure {
    pub fn new(mut violations: Vec<Violation>) -> Self {
        violations.sort_by_key(|violation| violation.rule.priority());
        Self { violations }
    }

    /// The first reported violation.
    pub fn first(&self) -> Option<&Violation> {
        self.violations.first()
    }

    /// Human readable message of the first reported violation.
    pub fn message(&self) -> String {
        self.first().map(ToString::to_string).unwrap_or_default()
    }

    /// Every violation found, in reporting order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Whether any violation has exactly this message.
    pub fn contains_message(&self, message: &str) -> bool {
        self.violations.iter().any(|v| v.to_string() == message)
    }
}

fn join_messages(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(". ")
}
