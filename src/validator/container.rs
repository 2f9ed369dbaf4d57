use super::{Check, Failure, Validator, check_none};
use crate::types::{ScalarKind, Value};

fn check_kind(kind: Option<ScalarKind>, index: usize, item: &Value) -> Check {
    match kind {
        Some(kind) if !kind.matches(item) => {
            Err(Failure::new(format!("not instance of {kind} : {item}")).at_index(index))
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListValidator {
    element: Option<ScalarKind>,
    min: Option<usize>,
    max: Option<usize>,
    allow_empty: bool,
    item: Option<Box<Validator>>,
    allow_none: bool,
}

impl ListValidator {
    pub fn new(element: Option<ScalarKind>) -> Self {
        Self {
            element,
            min: None,
            max: None,
            allow_empty: true,
            item: None,
            allow_none: false,
        }
    }

    pub fn length_in_range(mut self, min: impl Into<Option<usize>>, max: impl Into<Option<usize>>) -> Self {
        self.min = min.into();
        self.max = max.into();
        self
    }

    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    /// Applied to every element; the first failing index is reported.
    pub fn on_item(mut self, validator: impl Into<Validator>) -> Self {
        self.item = Some(Box::new(validator.into()));
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
        let Value::List(items) = value else {
            return Err(Failure::type_mismatch(format!("not instance of list : {value}")));
        };
        let len = items.len();
        if len == 0 && !self.allow_empty {
            return Err(Failure::new("empty list"));
        }
        match (self.min, self.max) {
            (Some(a), None) if len < a => {
                return Err(Failure::new(format!("list length less than {a}: {len}")));
            }
            (None, Some(b)) if len > b => {
                return Err(Failure::new(format!("list length over {b}: {len}")));
            }
            (Some(a), Some(b)) if len < a || len > b => {
                return Err(Failure::new(format!("list length out of range [{a}, {b}]: {len}")));
            }
            _ => {}
        }
        for (i, item) in items.iter().enumerate() {
            check_kind(self.element, i, item)?;
        }
        if let Some(validator) = &self.item {
            for (i, item) in items.iter().enumerate() {
                validator.check(item).map_err(|f| f.at_index(i))?;
            }
        }
        Ok(())
    }
}

/// Positions a per-item tuple validator applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemIndex {
    All,
    At(usize),
    Each(Vec<usize>),
}

impl ItemIndex {
    fn covers(&self, index: usize) -> bool {
        match self {
            ItemIndex::All => true,
            ItemIndex::At(i) => *i == index,
            ItemIndex::Each(indices) => indices.contains(&index),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleValidator {
    slots: Vec<Option<ScalarKind>>,
    /// `Some` when the tuple ends in a repeating tail; the inner kind may be any.
    tail: Option<Option<ScalarKind>>,
    items: Vec<(ItemIndex, Validator)>,
    allow_none: bool,
}

impl TupleValidator {
    pub fn fixed(slots: impl IntoIterator<Item = Option<ScalarKind>>) -> Self {
        Self {
            slots: slots.into_iter().collect(),
            tail: None,
            items: Vec::new(),
            allow_none: false,
        }
    }

    pub fn repeat(prefix: impl IntoIterator<Item = Option<ScalarKind>>, tail: Option<ScalarKind>) -> Self {
        Self {
            tail: Some(tail),
            ..Self::fixed(prefix)
        }
    }

    /// `None` applies the validator to every position.
    pub fn on_item(mut self, index: Option<usize>, validator: impl Into<Validator>) -> Self {
        let index = index.map_or(ItemIndex::All, ItemIndex::At);
        self.items.push((index, validator.into()));
        self
    }

    pub fn on_items(mut self, indices: &[usize], validator: impl Into<Validator>) -> Self {
        self.items.push((ItemIndex::Each(indices.to_vec()), validator.into()));
        self
    }

    pub fn optional(mut self) -> Self {
        self.allow_none = true;
        self
    }

    fn kind_at(&self, index: usize) -> Option<ScalarKind> {
        match self.slots.get(index) {
            Some(kind) => *kind,
            None => self.tail.flatten(),
        }
    }

    pub fn check(&self, value: &Value) -> Check {
        if let Some(result) = check_none(value, self.allow_none) {
            return result;
        }
        let Value::Tuple(items) = value else {
            return Err(Failure::type_mismatch(format!("not instance of tuple : {value}")));
        };
        let len = items.len();
        match self.tail {
            None if len != self.slots.len() => {
                return Err(Failure::new(format!(
                    "length not match to {} : {len}",
                    self.slots.len()
                )));
            }
            Some(_) if len <= self.slots.len() => {
                return Err(Failure::new(format!(
                    "length less than {} : {len}",
                    self.slots.len() + 1
                )));
            }
            _ => {}
        }
        for (i, item) in items.iter().enumerate() {
            check_kind(self.kind_at(i), i, item)?;
        }
        for (i, item) in items.iter().enumerate() {
            for (index, validator) in &self.items {
                if index.covers(i) {
                    validator.check(item).map_err(|f| f.at_index(i))?;
                }
            }
        }
        Ok(())
    }
}
