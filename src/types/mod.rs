pub mod casters;
pub mod errors;
mod value;

pub use casters::Caster;
pub use errors::{CoercionError, TypeSyntaxError};
pub use value::{FromValue, Value};

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Element kinds a token can be converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
    Str,
    Path,
}

impl ScalarKind {
    pub fn coerce(self, raw: &str) -> Result<Value, CoercionError> {
        match self {
            ScalarKind::Bool => parse_bool(raw)
                .map(Value::Bool)
                .ok_or_else(|| CoercionError::new(raw, self, "not a boolean word")),
            ScalarKind::Int => raw
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| CoercionError::new(raw, self, e.to_string())),
            ScalarKind::Float => raw
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| CoercionError::new(raw, self, e.to_string())),
            ScalarKind::Str => Ok(Value::Str(raw.to_string())),
            ScalarKind::Path => Ok(Value::Path(PathBuf::from(raw))),
        }
    }

    /// Whether `value` already has this kind. Floats admit ints, paths admit strings.
    pub fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ScalarKind::Bool, Value::Bool(_))
                | (ScalarKind::Int, Value::Int(_))
                | (ScalarKind::Float, Value::Float(_) | Value::Int(_))
                | (ScalarKind::Str, Value::Str(_))
                | (ScalarKind::Path, Value::Path(_) | Value::Str(_))
        )
    }

    fn conform(self, value: Value) -> Option<Value> {
        match (self, value) {
            (ScalarKind::Float, Value::Int(i)) => Some(Value::Float(i as f64)),
            (ScalarKind::Path, Value::Str(s)) => Some(Value::Path(PathBuf::from(s))),
            (kind, Value::Str(s)) if kind != ScalarKind::Str => kind.coerce(&s).ok(),
            (kind, v) if kind.matches(&v) => Some(v),
            _ => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ScalarKind::Int | ScalarKind::Float)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::Str => "str",
            ScalarKind::Path => "path",
        };
        f.write_str(name)
    }
}

impl FromStr for ScalarKind {
    type Err = TypeSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "bool" => Ok(ScalarKind::Bool),
            "int" => Ok(ScalarKind::Int),
            "float" => Ok(ScalarKind::Float),
            "str" => Ok(ScalarKind::Str),
            "path" => Ok(ScalarKind::Path),
            other => Err(TypeSyntaxError::UnknownType(other.to_string())),
        }
    }
}

/// Parses the boolean words accepted on the command line.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "+" | "1" | "t" | "true" | "y" | "yes" => Some(true),
        "-" | "0" | "f" | "false" | "n" | "no" | "x" => Some(false),
        _ => None,
    }
}

/// Comma separated tuple layout: a fixed prefix, optionally followed by a
/// repeating tail that needs at least one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleShape {
    prefix: Vec<ScalarKind>,
    tail: Option<ScalarKind>,
}

impl TupleShape {
    pub fn fixed(kinds: impl IntoIterator<Item = ScalarKind>) -> Self {
        Self {
            prefix: kinds.into_iter().collect(),
            tail: None,
        }
    }

    pub fn repeat(prefix: impl IntoIterator<Item = ScalarKind>, tail: ScalarKind) -> Self {
        Self {
            prefix: prefix.into_iter().collect(),
            tail: Some(tail),
        }
    }

    /// `tuple[kind...]`
    pub fn of(kind: ScalarKind) -> Self {
        Self::repeat([], kind)
    }

    pub fn prefix(&self) -> &[ScalarKind] {
        &self.prefix
    }

    pub fn tail(&self) -> Option<ScalarKind> {
        self.tail
    }

    pub fn min_len(&self) -> usize {
        self.prefix.len() + usize::from(self.tail.is_some())
    }

    pub fn kind_at(&self, index: usize) -> Option<ScalarKind> {
        self.prefix.get(index).copied().or(self.tail)
    }

    fn accepts_len(&self, len: usize) -> bool {
        match self.tail {
            Some(_) => len >= self.min_len(),
            None => len == self.prefix.len(),
        }
    }
}

impl fmt::Display for TupleShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.prefix.iter().map(|k| k.to_string()).collect();
        if let Some(tail) = self.tail {
            parts.push(format!("{tail}..."));
        }
        write!(f, "tuple[{}]", parts.join(","))
    }
}

/// Semantic type tag of an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    Scalar(ScalarKind),
    Literal { choices: Vec<String>, complete: bool },
    Tuple(TupleShape),
    List(ScalarKind),
    Optional(Box<ValueType>),
    Union(Vec<ValueType>),
}

impl ValueType {
    pub const BOOL: ValueType = ValueType::Scalar(ScalarKind::Bool);
    pub const INT: ValueType = ValueType::Scalar(ScalarKind::Int);
    pub const FLOAT: ValueType = ValueType::Scalar(ScalarKind::Float);
    pub const STR: ValueType = ValueType::Scalar(ScalarKind::Str);
    pub const PATH: ValueType = ValueType::Scalar(ScalarKind::Path);

    pub fn literal<S: Into<String>>(choices: impl IntoIterator<Item = S>) -> Self {
        ValueType::Literal {
            choices: choices.into_iter().map(Into::into).collect(),
            complete: false,
        }
    }

    /// Literal that also accepts an unambiguous prefix of a choice.
    pub fn literal_prefix<S: Into<String>>(choices: impl IntoIterator<Item = S>) -> Self {
        ValueType::Literal {
            choices: choices.into_iter().map(Into::into).collect(),
            complete: true,
        }
    }

    pub fn optional(inner: ValueType) -> Self {
        ValueType::Optional(Box::new(inner))
    }

    pub fn is_bool(&self) -> bool {
        *self == ValueType::BOOL
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ValueType::List(_))
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, ValueType::Optional(_))
    }

    /// Whether a token that looks like a negative number should be taken as a value.
    pub fn is_numeric(&self) -> bool {
        match self {
            ValueType::Scalar(kind) | ValueType::List(kind) => kind.is_numeric(),
            ValueType::Tuple(shape) => shape.prefix.iter().chain(shape.tail.iter()).any(|k| k.is_numeric()),
            ValueType::Optional(inner) => inner.is_numeric(),
            ValueType::Union(alts) => alts.iter().any(ValueType::is_numeric),
            ValueType::Literal { .. } => false,
        }
    }

    /// Metavar implied by the type, if any.
    pub fn metavar(&self) -> Option<String> {
        match self {
            ValueType::Literal { choices, .. } => Some(choices.join("|")),
            ValueType::Optional(inner) => inner.metavar(),
            _ => None,
        }
    }

    /// Converts one raw token. Lists take their canonical comma joined form.
    pub fn coerce(&self, raw: &str) -> Result<Value, CoercionError> {
        match self {
            ValueType::Scalar(kind) => kind.coerce(raw),
            ValueType::Literal { choices, complete } => coerce_literal(raw, choices, *complete, self),
            ValueType::Tuple(shape) => {
                let parts: Vec<&str> = raw.split(',').collect();
                if !shape.accepts_len(parts.len()) {
                    return Err(CoercionError::new(
                        raw,
                        self,
                        format!("got {} elements", parts.len()),
                    ));
                }
                parts
                    .iter()
                    .enumerate()
                    .map(|(i, part)| {
                        let kind = shape.kind_at(i).unwrap_or(ScalarKind::Str);
                        kind.coerce(part)
                            .map_err(|e| CoercionError::new(raw, self, format!("at index {i}, {}", e.reason)))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Tuple)
            }
            ValueType::List(kind) => {
                if raw.is_empty() {
                    return Ok(Value::List(Vec::new()));
                }
                raw.split(',')
                    .map(|part| kind.coerce(part))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List)
                    .map_err(|e| CoercionError::new(raw, self, e.reason))
            }
            ValueType::Optional(inner) => inner.coerce(raw),
            ValueType::Union(alternatives) => alternatives
                .iter()
                .find_map(|alt| alt.coerce(raw).ok())
                .ok_or_else(|| CoercionError::new(raw, self, "no alternative matched")),
        }
    }

    /// Converts a single element token of a multi-token list.
    pub fn coerce_element(&self, raw: &str) -> Result<Value, CoercionError> {
        match self {
            ValueType::List(kind) => kind.coerce(raw),
            ValueType::Optional(inner) => inner.coerce_element(raw),
            other => other.coerce(raw),
        }
    }

    /// Whether `value` is already assignable to this type.
    pub fn conforms(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueType::Scalar(kind), v) => kind.matches(v),
            (ValueType::Literal { choices, .. }, Value::Str(s)) => choices.contains(s),
            (ValueType::Tuple(shape), Value::Tuple(items)) => {
                shape.accepts_len(items.len())
                    && items
                        .iter()
                        .enumerate()
                        .all(|(i, item)| shape.kind_at(i).is_some_and(|k| k.matches(item)))
            }
            (ValueType::List(kind), Value::List(items)) => items.iter().all(|item| kind.matches(item)),
            (ValueType::Optional(_), Value::None) => true,
            (ValueType::Optional(inner), v) => inner.conforms(v),
            (ValueType::Union(alternatives), v) => alternatives.iter().any(|alt| alt.conforms(v)),
            _ => false,
        }
    }

    /// Converts a value from a configuration document into this type.
    pub fn conform(&self, value: Value) -> Result<Value, CoercionError> {
        if let Value::Str(raw) = &value {
            if !self.conforms(&value) {
                return self.coerce(raw);
            }
        }
        let shown = value.to_string();
        let fail = |reason: &str| CoercionError::new(&shown, self, reason);
        match (self, value) {
            (ValueType::Scalar(kind), v) => kind.conform(v).ok_or_else(|| fail("incompatible value")),
            (ValueType::Tuple(shape), Value::List(items) | Value::Tuple(items)) => {
                if !shape.accepts_len(items.len()) {
                    return Err(fail("wrong number of elements"));
                }
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| {
                        shape
                            .kind_at(i)
                            .and_then(|k| k.conform(item))
                            .ok_or_else(|| fail(&format!("wrong element type at {i}")))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Tuple)
            }
            (ValueType::List(kind), Value::List(items)) => items
                .into_iter()
                .map(|item| kind.conform(item).ok_or_else(|| fail("wrong element type")))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            (ValueType::Optional(_), Value::None) => Ok(Value::None),
            (ValueType::Optional(inner), v) => inner.conform(v),
            (ValueType::Union(alternatives), v) => alternatives
                .iter()
                .find_map(|alt| alt.conform(v.clone()).ok())
                .ok_or_else(|| fail("no alternative matched")),
            (t, v) if t.conforms(&v) => Ok(v),
            _ => Err(fail("incompatible value")),
        }
    }
}

fn coerce_literal(
    raw: &str,
    choices: &[String],
    complete: bool,
    declared: &ValueType,
) -> Result<Value, CoercionError> {
    if choices.iter().any(|c| c == raw) {
        return Ok(Value::Str(raw.to_string()));
    }
    if !complete {
        return Err(CoercionError::new(raw, declared, "not one of the choices"));
    }
    let candidates: Vec<&String> = choices.iter().filter(|c| c.starts_with(raw)).collect();
    match candidates.as_slice() {
        [] => Err(CoercionError::new(raw, declared, "not one of the choices")),
        [single] => Ok(Value::Str((*single).clone())),
        many => Err(CoercionError::new(
            raw,
            declared,
            format!(
                "ambiguous between {}",
                many.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
            ),
        )),
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Scalar(kind) => write!(f, "{kind}"),
            ValueType::Literal { choices, complete } => {
                let star = if *complete { "*" } else { "" };
                write!(f, "literal{star}[{}]", choices.join(","))
            }
            ValueType::Tuple(shape) => write!(f, "{shape}"),
            ValueType::List(kind) => write!(f, "list[{kind}]"),
            ValueType::Optional(inner) => write!(f, "optional[{inner}]"),
            ValueType::Union(alternatives) => {
                let parts: Vec<String> = alternatives.iter().map(|a| a.to_string()).collect();
                write!(f, "union[{}]", parts.join(","))
            }
        }
    }
}

impl FromStr for ValueType {
    type Err = TypeSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let expr = s.trim();
        let malformed = |reason: &str| TypeSyntaxError::Malformed {
            expr: expr.to_string(),
            reason: reason.to_string(),
        };

        let Some(open) = expr.find('[') else {
            return expr.parse::<ScalarKind>().map(ValueType::Scalar);
        };
        let inner = expr[open + 1..]
            .strip_suffix(']')
            .ok_or_else(|| malformed("missing closing bracket"))?;
        let parts = split_top_level(inner);

        match &expr[..open] {
            "list" => Ok(ValueType::List(inner.parse()?)),
            "optional" => Ok(ValueType::optional(inner.parse()?)),
            "union" => parts
                .iter()
                .map(|p| p.parse::<ValueType>())
                .collect::<Result<Vec<_>, _>>()
                .map(ValueType::Union),
            "literal" | "literal*" => {
                let choices: Vec<String> = parts.iter().map(|p| p.trim().to_string()).collect();
                if choices.iter().any(String::is_empty) {
                    return Err(malformed("empty literal choice"));
                }
                Ok(ValueType::Literal {
                    choices,
                    complete: expr.starts_with("literal*"),
                })
            }
            "tuple" => {
                let (last, head) = parts.split_last().ok_or_else(|| malformed("empty tuple"))?;
                let prefix = head
                    .iter()
                    .map(|p| p.parse::<ScalarKind>())
                    .collect::<Result<Vec<_>, _>>()?;
                match last.trim().strip_suffix("...") {
                    Some(tail) => Ok(ValueType::Tuple(TupleShape::repeat(prefix, tail.parse()?))),
                    None => {
                        let mut kinds = prefix;
                        kinds.push(last.parse()?);
                        Ok(ValueType::Tuple(TupleShape::fixed(kinds)))
                    }
                }
            }
            other => Err(TypeSyntaxError::UnknownType(other.to_string())),
        }
    }
}

fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_coercion() {
        assert_eq!(ValueType::INT.coerce("42").unwrap(), Value::Int(42));
        assert_eq!(ValueType::FLOAT.coerce("2.5").unwrap(), Value::Float(2.5));
        assert_eq!(ValueType::BOOL.coerce("Yes").unwrap(), Value::Bool(true));
        assert_eq!(ValueType::BOOL.coerce("x").unwrap(), Value::Bool(false));
        assert_eq!(
            ValueType::PATH.coerce("does/not/exist").unwrap(),
            Value::Path(PathBuf::from("does/not/exist"))
        );

        let err = ValueType::INT.coerce("abc").unwrap_err();
        assert_eq!(err.raw, "abc");
        assert_eq!(err.expected, "int");
    }

    #[test]
    fn tuple_coercion() {
        let pair = ValueType::Tuple(TupleShape::fixed([ScalarKind::Int, ScalarKind::Str]));
        assert_eq!(
            pair.coerce("1,a").unwrap(),
            Value::Tuple(vec![Value::Int(1), Value::Str("a".into())])
        );
        assert!(pair.coerce("1").is_err());
        assert!(pair.coerce("1,a,b").is_err());
        assert!(pair.coerce("a,1").is_err());

        let ints = ValueType::Tuple(TupleShape::of(ScalarKind::Int));
        assert_eq!(ints.coerce("1,2,3").unwrap().as_items().unwrap().len(), 3);
        assert!(ints.coerce("1,b").is_err());
    }

    #[test]
    fn canonical_forms_round_trip() {
        let cases = [
            ("tuple[int,int]", "3,4"),
            ("tuple[str,float...]", "x,1.5,2"),
            ("list[int]", "1,-2,3"),
            ("int", "-17"),
            ("literal[low,high]", "high"),
            ("path", "a/b.txt"),
        ];
        for (ty, raw) in cases {
            let ty: ValueType = ty.parse().unwrap();
            assert_eq!(ty.coerce(raw).unwrap().to_string(), raw, "{ty}");
        }
    }

    #[test]
    fn literal_prefix_completion() {
        let ty = ValueType::literal_prefix(["apple", "apricot", "banana"]);
        assert_eq!(ty.coerce("b").unwrap(), Value::Str("banana".into()));
        assert!(ty.coerce("ap").is_err());
        assert!(ty.coerce("c").is_err());
        assert!(ValueType::literal(["apple"]).coerce("app").is_err());
    }

    #[test]
    fn union_first_success_wins() {
        let ty = ValueType::Union(vec![ValueType::INT, ValueType::FLOAT, ValueType::STR]);
        assert_eq!(ty.coerce("3").unwrap(), Value::Int(3));
        assert_eq!(ty.coerce("3.5").unwrap(), Value::Float(3.5));
        assert_eq!(ty.coerce("abc").unwrap(), Value::Str("abc".into()));

        let strict = ValueType::Union(vec![ValueType::INT, ValueType::FLOAT]);
        assert!(strict.coerce("abc").is_err());
    }

    #[test]
    fn type_expressions_parse_and_display() {
        for expr in [
            "int",
            "list[path]",
            "tuple[int,str]",
            "tuple[str,int...]",
            "literal[a,b]",
            "literal*[a,b]",
            "optional[float]",
            "union[int,tuple[int,int]]",
        ] {
            let ty: ValueType = expr.parse().unwrap();
            assert_eq!(ty.to_string(), expr);
        }
        assert!("complex".parse::<ValueType>().is_err());
        assert!("list[int".parse::<ValueType>().is_err());
    }

    #[test]
    fn conform_document_values() {
        assert_eq!(ValueType::FLOAT.conform(Value::Int(2)).unwrap(), Value::Float(2.0));
        assert_eq!(ValueType::INT.conform(Value::Str("7".into())).unwrap(), Value::Int(7));
        let pair = ValueType::Tuple(TupleShape::fixed([ScalarKind::Int, ScalarKind::Float]));
        assert_eq!(
            pair.conform(Value::List(vec![Value::Int(1), Value::Int(2)])).unwrap(),
            Value::Tuple(vec![Value::Int(1), Value::Float(2.0)])
        );
        assert!(ValueType::INT.conform(Value::Bool(true)).is_err());
        assert_eq!(
            ValueType::optional(ValueType::INT).conform(Value::None).unwrap(),
            Value::None
        );
    }
}
