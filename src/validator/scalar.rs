use super::{Check, Failure, check_none};
use crate::types::Value;
use regex::Regex;

#[derive(Debug, Clone)]
enum StrRule {
    Length { min: Option<usize>, max: Option<usize> },
    Matches(Regex),
    StartsWith(String),
    EndsWith(String),
    Contains(Vec<String>),
    OneOf(Vec<String>),
}

impl PartialEq for StrRule {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StrRule::Length { min: a, max: b }, StrRule::Length { min: c, max: d }) => a == c && b == d,
            (StrRule::Matches(a), StrRule::Matches(b)) => a.as_str() == b.as_str(),
            (StrRule::StartsWith(a), StrRule::StartsWith(b)) | (StrRule::EndsWith(a), StrRule::EndsWith(b)) => a == b,
            (StrRule::Contains(a), StrRule::Contains(b)) | (StrRule::OneOf(a), StrRule::OneOf(b)) => a == b,
            _ => false,
        }
    }
}

impl StrRule {
    fn check(&self, s: &str) -> Check {
        let ok = match self {
            StrRule::Length { min, max } => {
                let len = s.chars().count();
                min.is_none_or(|m| m <= len) && max.is_none_or(|m| len <= m)
            }
            StrRule::Matches(re) => re.find(s).is_some_and(|m| m.start() == 0),
            StrRule::StartsWith(prefix) => s.starts_with(prefix.as_str()),
            StrRule::EndsWith(suffix) => s.ends_with(suffix.as_str()),
            StrRule::Contains(texts) => texts.iter().any(|t| s.contains(t.as_str())),
            StrRule::OneOf(options) => options.iter().any(|o| o == s),
        };
        if ok {
            return Ok(());
        }
        let reason = match self {
            StrRule::Length { min: Some(a), max: None } => format!("str length less than {a}: \"{s}\""),
            StrRule::Length { min: None, max: Some(b) } => format!("str length over {b}: \"{s}\""),
            StrRule::Length { min, max } => format!(
                "str length out of range [{}, {}]: \"{s}\"",
                min.unwrap_or_default(),
                max.unwrap_or_default()
            ),
            StrRule::Matches(re) => format!("str does not match to {} : \"{s}\"", re.as_str()),
            StrRule::StartsWith(prefix) => format!("str does not start with {prefix}: \"{s}\""),
            StrRule::EndsWith(suffix) => format!("str does not end with {suffix}: \"{s}\""),
            StrRule::Contains(texts) => format!("str does not contain one of {texts:?}: \"{s}\""),
            StrRule::OneOf(options) => format!("str not in allowed set {options:?}: \"{s}\""),
        };
        Err(Failure::new(reason))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrValidator {
    rules: Vec<StrRule>,
    allow_none: bool,
}

impl StrValidator {
    /// Character count within `[min, max]`; either bound may be open.
    pub fn length_in_range(mut self, min: impl Into<Option<usize>>, max: impl Into<Option<usize>>) -> Self {
        self.rules.push(StrRule::Length {
            min: min.into(),
            max: max.into(),
        });
        self
    }

    /// The regex must match at the start of the string.
    pub fn matches(mut self, re: Regex) -> Self {
        self.rules.push(StrRule::Matches(re));
        self
    }

    pub fn pattern(self, pattern: &str) -> Result<Self, regex::Error> {
        Ok(self.matches(Regex::new(pattern)?))
    }

    pub fn starts_with(mut self, prefix: impl Into<String>) -> Self {
        self.rules.push(StrRule::StartsWith(prefix.into()));
        self
    }

    pub fn ends_with(mut self, suffix: impl Into<String>) -> Self {
        self.rules.push(StrRule::EndsWith(suffix.into()));
        self
    }

    /// Passes when any of `texts` occurs in the string.
    pub fn contains<S: Into<String>>(mut self, texts: impl IntoIterator<Item = S>) -> Self {
        self.rules
            .push(StrRule::Contains(texts.into_iter().map(Into::into).collect()));
        self
    }

    pub fn one_of<S: Into<String>>(mut self, options: impl IntoIterator<Item = S>) -> Self {
        self.rules
            .push(StrRule::OneOf(options.into_iter().map(Into::into).collect()));
        self
    }

    pub fn optional(mut self) -> Self {
        self.allow_none = true;
        self
    }

    pub fn check(&self, value: &Value) -> Check {
        if let Some(result) = check_none(value, self.allow_none) {
            return result;
        }
        let Value::Str(s) = value else {
            return Err(Failure::type_mismatch(format!("not instance of str : {value}")));
        };
        self.rules.iter().try_for_each(|rule| rule.check(s))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum IntRule {
    Range { min: Option<i64>, max: Option<i64>, inclusive: bool },
    Positive { include_zero: bool },
    Negative { include_zero: bool },
}

impl IntRule {
    fn check(&self, v: i64) -> Check {
        let ok = match *self {
            IntRule::Range { min, max, inclusive: true } => {
                min.is_none_or(|a| a <= v) && max.is_none_or(|b| v <= b)
            }
            IntRule::Range { min, max, inclusive: false } => {
                min.is_none_or(|a| a < v) && max.is_none_or(|b| v < b)
            }
            IntRule::Positive { include_zero: true } => v >= 0,
            IntRule::Positive { include_zero: false } => v > 0,
            IntRule::Negative { include_zero: true } => v <= 0,
            IntRule::Negative { include_zero: false } => v < 0,
        };
        if ok {
            return Ok(());
        }
        let reason = match *self {
            IntRule::Range { min: Some(a), max: None, .. } => format!("value less than {a}: {v}"),
            IntRule::Range { min: None, max: Some(b), .. } => format!("value over {b}: {v}"),
            IntRule::Range { min, max, inclusive } => {
                let (open, close) = if inclusive { ('[', ']') } else { ('(', ')') };
                format!(
                    "value out of range {open}{}, {}{close}: {v}",
                    min.unwrap_or_default(),
                    max.unwrap_or_default()
                )
            }
            IntRule::Positive { include_zero: true } => format!("not a non-negative value: {v}"),
            IntRule::Positive { include_zero: false } => format!("not a positive value: {v}"),
            IntRule::Negative { include_zero: true } => format!("not a non-positive value: {v}"),
            IntRule::Negative { include_zero: false } => format!("not a negative value: {v}"),
        };
        Err(Failure::new(reason))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntValidator {
    rules: Vec<IntRule>,
    allow_none: bool,
}

impl IntValidator {
    /// Inclusive range; either bound may be open.
    pub fn in_range(mut self, min: impl Into<Option<i64>>, max: impl Into<Option<i64>>) -> Self {
        self.rules.push(IntRule::Range {
            min: min.into(),
            max: max.into(),
            inclusive: true,
        });
        self
    }

    /// Exclusive range; either bound may be open.
    pub fn in_range_exclusive(mut self, min: impl Into<Option<i64>>, max: impl Into<Option<i64>>) -> Self {
        self.rules.push(IntRule::Range {
            min: min.into(),
            max: max.into(),
            inclusive: false,
        });
        self
    }

    pub fn positive(mut self, include_zero: bool) -> Self {
        self.rules.push(IntRule::Positive { include_zero });
        self
    }

    pub fn negative(mut self, include_zero: bool) -> Self {
        self.rules.push(IntRule::Negative { include_zero });
        self
    }

    pub fn optional(mut self) -> Self {
        self.allow_none = true;
        self
    }

    pub fn check(&self, value: &Value) -> Check {
        if let Some(result) = check_none(value, self.allow_none) {
            return result;
        }
        let Value::Int(v) = value else {
            return Err(Failure::type_mismatch(format!("not instance of int : {value}")));
        };
        self.rules.iter().try_for_each(|rule| rule.check(*v))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FloatRule {
    Range { min: Option<f64>, max: Option<f64>, closed: bool },
    Positive { include_zero: bool },
    Negative { include_zero: bool },
}

impl FloatRule {
    fn check(&self, v: f64) -> Check {
        let ok = match *self {
            FloatRule::Range { min, max, closed: true } => {
                min.is_none_or(|a| a <= v) && max.is_none_or(|b| v <= b)
            }
            FloatRule::Range { min, max, closed: false } => {
                min.is_none_or(|a| a < v) && max.is_none_or(|b| v < b)
            }
            FloatRule::Positive { include_zero: true } => v >= 0.0,
            FloatRule::Positive { include_zero: false } => v > 0.0,
            FloatRule::Negative { include_zero: true } => v <= 0.0,
            FloatRule::Negative { include_zero: false } => v < 0.0,
        };
        if ok {
            return Ok(());
        }
        let reason = match *self {
            FloatRule::Range { min: Some(a), max: None, .. } => format!("value less than {a}: {v}"),
            FloatRule::Range { min: None, max: Some(b), .. } => format!("value over {b}: {v}"),
            FloatRule::Range { min, max, closed } => {
                let (open, close) = if closed { ('[', ']') } else { ('(', ')') };
                format!(
                    "value out of range {open}{}, {}{close}: {v}",
                    min.unwrap_or(f64::NEG_INFINITY),
                    max.unwrap_or(f64::INFINITY)
                )
            }
            FloatRule::Positive { include_zero: true } => format!("not a non-negative value: {v}"),
            FloatRule::Positive { include_zero: false } => format!("not a positive value: {v}"),
            FloatRule::Negative { include_zero: true } => format!("not a non-positive value: {v}"),
            FloatRule::Negative { include_zero: false } => format!("not a negative value: {v}"),
        };
        Err(Failure::new(reason))
    }
}

/// Accepts floats and ints. NaN is rejected unless allowed, before any rule runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloatValidator {
    rules: Vec<FloatRule>,
    allow_none: bool,
    allow_nan: bool,
}

impl FloatValidator {
    /// Open interval `(min, max)`.
    pub fn in_range(mut self, min: impl Into<Option<f64>>, max: impl Into<Option<f64>>) -> Self {
        self.rules.push(FloatRule::Range {
            min: min.into(),
            max: max.into(),
            closed: false,
        });
        self
    }

    /// Closed interval `[min, max]`.
    pub fn in_range_closed(mut self, min: impl Into<Option<f64>>, max: impl Into<Option<f64>>) -> Self {
        self.rules.push(FloatRule::Range {
            min: min.into(),
            max: max.into(),
            closed: true,
        });
        self
    }

    pub fn allow_nan(mut self, allow: bool) -> Self {
        self.allow_nan = allow;
        self
    }

    pub fn positive(mut self, include_zero: bool) -> Self {
        self.rules.push(FloatRule::Positive { include_zero });
        self
    }

    pub fn negative(mut self, include_zero: bool) -> Self {
        self.rules.push(FloatRule::Negative { include_zero });
        self
    }

    pub fn optional(mut self) -> Self {
        self.allow_none = true;
        self
    }

    pub fn check(&self, value: &Value) -> Check {
        if let Some(result) = check_none(value, self.allow_none) {
            return result;
        }
        let Some(v) = value.as_float() else {
            return Err(Failure::type_mismatch(format!("not instance of float : {value}")));
        };
        if v.is_nan() {
            return if self.allow_nan {
                Ok(())
            } else {
                Err(Failure::new("NaN"))
            };
        }
        self.rules.iter().try_for_each(|rule| rule.check(v))
    }
}
