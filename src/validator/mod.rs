//! Composable value predicates.
//!
//! Typed builders (`Validator::str()`, `Validator::int()`, ...) collect rules
//! fluently and convert into [`Validator`]. Validators combine with `&` (all
//! must pass, first failure reported) and `|` (first pass wins, failures
//! aggregated).

mod container;
pub mod errors;
mod path;
mod scalar;

pub use container::{ItemIndex, ListValidator, TupleValidator};
pub use errors::ValidationError;
pub use path::PathValidator;
pub use scalar::{FloatValidator, IntValidator, StrValidator};

use crate::types::{ScalarKind, Value};
use std::any::Any;
use std::fmt;
use std::ops::{BitAnd, BitOr};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Why a value failed a check.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub reason: String,
    /// Set when the value had the wrong kind for the check. `any` drops these
    /// from its aggregated message.
    pub type_mismatch: bool,
}

impl Failure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            type_mismatch: false,
        }
    }

    pub fn type_mismatch(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            type_mismatch: true,
        }
    }

    pub(crate) fn at_index(self, index: usize) -> Self {
        Self {
            reason: format!("at index {index}, {}", self.reason),
            type_mismatch: false,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

pub type Check = Result<(), Failure>;

#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    Str(StrValidator),
    Int(IntValidator),
    Float(FloatValidator),
    Path(PathValidator),
    List(ListValidator),
    Tuple(TupleValidator),
    All(Vec<Validator>),
    Any(Vec<Validator>),
    Func(FnValidator),
    IsNone,
    NonNone,
}

impl Validator {
    pub fn str() -> StrValidator {
        StrValidator::default()
    }

    pub fn int() -> IntValidator {
        IntValidator::default()
    }

    pub fn float() -> FloatValidator {
        FloatValidator::default()
    }

    pub fn path() -> PathValidator {
        PathValidator::default()
    }

    /// A list whose elements, when `element` is given, all have that kind.
    pub fn list(element: Option<ScalarKind>) -> ListValidator {
        ListValidator::new(element)
    }

    /// A tuple of exactly `len` elements of any kind.
    pub fn tuple_len(len: usize) -> TupleValidator {
        TupleValidator::fixed(vec![None; len])
    }

    /// A tuple with one slot per entry; `None` slots accept any kind.
    pub fn tuple(slots: impl IntoIterator<Item = Option<ScalarKind>>) -> TupleValidator {
        TupleValidator::fixed(slots)
    }

    /// A fixed prefix followed by one or more elements of `tail`.
    pub fn tuple_repeat(
        prefix: impl IntoIterator<Item = Option<ScalarKind>>,
        tail: Option<ScalarKind>,
    ) -> TupleValidator {
        TupleValidator::repeat(prefix, tail)
    }

    /// Passes when every validator passes. Empty passes.
    pub fn all<V: Into<Validator>>(validators: impl IntoIterator<Item = V>) -> Self {
        Validator::All(validators.into_iter().map(Into::into).collect())
    }

    /// Passes when at least one validator passes. Empty passes.
    pub fn any<V: Into<Validator>>(validators: impl IntoIterator<Item = V>) -> Self {
        Validator::Any(validators.into_iter().map(Into::into).collect())
    }

    /// Closure returning `false` (or panicking) on failure.
    pub fn func<F>(f: F) -> FnValidator
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        FnValidator::new(move |v| Ok(f(v)))
    }

    /// Closure whose `Err` is folded into a failure.
    pub fn try_func<F, E>(f: F) -> FnValidator
    where
        F: Fn(&Value) -> Result<bool, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        FnValidator::new(move |v| f(v).map_err(|e| e.to_string()))
    }

    pub fn is_none() -> Self {
        Validator::IsNone
    }

    pub fn non_none() -> Self {
        Validator::NonNone
    }

    pub fn check(&self, value: &Value) -> Check {
        match self {
            Validator::Str(v) => v.check(value),
            Validator::Int(v) => v.check(value),
            Validator::Float(v) => v.check(value),
            Validator::Path(v) => v.check(value),
            Validator::List(v) => v.check(value),
            Validator::Tuple(v) => v.check(value),
            Validator::All(validators) => validators.iter().try_for_each(|v| v.check(value)),
            Validator::Any(validators) => check_any(validators, value),
            Validator::Func(v) => v.check(value),
            Validator::IsNone if value.is_none() => Ok(()),
            Validator::IsNone => Err(Failure::new(format!("not none: {value}"))),
            Validator::NonNone if value.is_none() => Err(Failure::new("none")),
            Validator::NonNone => Ok(()),
        }
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        self.check(value).is_ok()
    }

    /// Runs the check and names the attribute on failure.
    pub fn validate(&self, attr: &str, value: &Value) -> Result<(), ValidationError> {
        self.check(value).map_err(|failure| ValidationError {
            attr: attr.to_string(),
            value: value.to_string(),
            reason: failure.reason,
        })
    }
}

fn check_any(validators: &[Validator], value: &Value) -> Check {
    if validators.is_empty() {
        return Ok(());
    }
    let mut reasons = Vec::new();
    let mut all_type_mismatch = true;
    for validator in validators {
        match validator.check(value) {
            Ok(()) => return Ok(()),
            Err(failure) if failure.type_mismatch => {}
            Err(failure) => {
                all_type_mismatch = false;
                reasons.push(failure.reason);
            }
        }
    }
    if all_type_mismatch {
        return Err(Failure::type_mismatch(format!(
            "{} does not satisfy any alternative",
            value.kind_name()
        )));
    }
    Err(Failure::new(reasons.join("; ")))
}

impl<R: Into<Validator>> BitAnd<R> for Validator {
    type Output = Validator;

    fn bitand(self, rhs: R) -> Validator {
        let mut validators = match self {
            Validator::All(v) => v,
            other => vec![other],
        };
        match rhs.into() {
            Validator::All(more) => validators.extend(more),
            other => validators.push(other),
        }
        Validator::All(validators)
    }
}

impl<R: Into<Validator>> BitOr<R> for Validator {
    type Output = Validator;

    fn bitor(self, rhs: R) -> Validator {
        let mut validators = match self {
            Validator::Any(v) => v,
            other => vec![other],
        };
        match rhs.into() {
            Validator::Any(more) => validators.extend(more),
            other => validators.push(other),
        }
        Validator::Any(validators)
    }
}

/// Lets every builder convert into [`Validator`] and use `&` / `|` directly.
macro_rules! validator_builder {
    ($($builder:ident => $variant:ident),* $(,)?) => {$(
        impl From<$builder> for Validator {
            fn from(value: $builder) -> Self {
                Validator::$variant(value)
            }
        }

        impl<R: Into<Validator>> BitAnd<R> for $builder {
            type Output = Validator;

            fn bitand(self, rhs: R) -> Validator {
                Validator::from(self) & rhs
            }
        }

        impl<R: Into<Validator>> BitOr<R> for $builder {
            type Output = Validator;

            fn bitor(self, rhs: R) -> Validator {
                Validator::from(self) | rhs
            }
        }
    )*};
}
validator_builder!(
    StrValidator => Str,
    IntValidator => Int,
    FloatValidator => Float,
    PathValidator => Path,
    ListValidator => List,
    TupleValidator => Tuple,
    FnValidator => Func,
);

type PredicateFn = dyn Fn(&Value) -> Result<bool, String> + Send + Sync;
type MessageFn = dyn Fn(&Value) -> String + Send + Sync;

/// A user closure. Returning `false`, returning `Err`, or panicking all count
/// as failures; none of them escape `check`.
#[derive(Clone)]
pub struct FnValidator {
    func: Arc<PredicateFn>,
    message: Option<Arc<MessageFn>>,
}

impl FnValidator {
    fn new<F>(func: F) -> Self
    where
        F: Fn(&Value) -> Result<bool, String> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            message: None,
        }
    }

    /// Failure message; `{}` is replaced by the offending value.
    pub fn message(self, template: impl Into<String>) -> Self {
        let template = template.into();
        self.message_with(move |v| template.replace("{}", &v.to_string()))
    }

    pub fn message_with<F>(mut self, message: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.message = Some(Arc::new(message));
        self
    }

    pub fn check(&self, value: &Value) -> Check {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (self.func)(value)));
        let default_reason = match outcome {
            Ok(Ok(true)) => return Ok(()),
            Ok(Ok(false)) => "validate failure".to_string(),
            Ok(Err(reason)) => reason,
            Err(payload) => format!("validator panicked: {}", panic_message(payload.as_ref())),
        };
        match &self.message {
            Some(message) => Err(Failure::new(message(value))),
            None => Err(Failure::new(default_reason)),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl fmt::Debug for FnValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator")
            .field("message", &self.message.is_some())
            .finish_non_exhaustive()
    }
}

impl PartialEq for FnValidator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

/// Shared `None` handling of the typed builders.
pub(crate) fn check_none(value: &Value, allow_none: bool) -> Option<Check> {
    if !value.is_none() {
        return None;
    }
    Some(if allow_none {
        Ok(())
    } else {
        Err(Failure::new("none"))
    })
}
