//! Custom conversions attached to individual arguments.
//!
//! A caster replaces the registry conversion of its argument's declared type.
//! For list typed arguments it is applied to every token separately.

use super::{CoercionError, ScalarKind, Value};
use std::fmt;
use std::sync::Arc;

type CastFn = dyn Fn(&str) -> Result<Value, String> + Send + Sync;

#[derive(Clone)]
pub struct Caster {
    name: String,
    func: Arc<CastFn>,
}

impl Caster {
    /// `name` describes the expected input in error messages.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cast(&self, raw: &str) -> Result<Value, CoercionError> {
        (self.func)(raw).map_err(|reason| CoercionError::new(raw, &self.name, reason))
    }
}

impl fmt::Debug for Caster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Caster").field("name", &self.name).finish_non_exhaustive()
    }
}

impl PartialEq for Caster {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.func, &other.func)
    }
}

/// `true`/`false` (any case), then int, then float, else the string itself.
pub fn literal_value() -> Caster {
    Caster::new("literal", |raw| {
        if raw.eq_ignore_ascii_case("true") {
            return Ok(Value::Bool(true));
        }
        if raw.eq_ignore_ascii_case("false") {
            return Ok(Value::Bool(false));
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Ok(Value::Int(i));
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Ok(Value::Float(f));
        }
        Ok(Value::Str(raw.to_string()))
    })
}

/// Empty input is `None`, an int when it parses, otherwise the original string.
pub fn try_int() -> Caster {
    Caster::new("int or str", |raw| {
        if raw.is_empty() {
            return Ok(Value::None);
        }
        Ok(raw
            .parse::<i64>()
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Str(raw.to_string())))
    })
}

/// Empty input is `None`, a float when it parses, otherwise the original string.
pub fn try_float() -> Caster {
    Caster::new("float or str", |raw| {
        if raw.is_empty() {
            return Ok(Value::None);
        }
        Ok(raw
            .parse::<f64>()
            .map(Value::Float)
            .unwrap_or_else(|_| Value::Str(raw.to_string())))
    })
}

/// Splits one token on `sep` into a list of `kind` values.
pub fn split_list(kind: ScalarKind, sep: char) -> Caster {
    Caster::new(format!("{sep}-separated {kind} list"), move |raw| {
        raw.split(sep)
            .map(|part| kind.coerce(part).map_err(|e| e.reason))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    })
}

/// `start:end` as an int pair.
pub fn int_range() -> Caster {
    Caster::new("start:end", |raw| {
        let (start, end) = raw.split_once(':').ok_or("missing ':'")?;
        let start = start.trim().parse::<i64>().map_err(|e| e.to_string())?;
        let end = end.trim().parse::<i64>().map_err(|e| e.to_string())?;
        Ok(Value::Tuple(vec![Value::Int(start), Value::Int(end)]))
    })
}

/// `key=value` or `key:value` as a `(str, kind)` pair. A bare key gets an empty value.
pub fn key_value(kind: ScalarKind) -> Caster {
    Caster::new(format!("key=<{kind}>"), move |raw| {
        let split = raw
            .find([':', '='])
            .map(|i| (&raw[..i], &raw[i + 1..]))
            .unwrap_or((raw, ""));
        let value = kind.coerce(split.1).map_err(|e| e.reason)?;
        Ok(Value::Tuple(vec![Value::Str(split.0.to_string()), value]))
    })
}
