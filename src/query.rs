//! Predicates, sort keys and the descriptors composed from them.
//!
//! A [`QueryDescriptor`] is what the executor runs: a base [`Entity`], at
//! most one [`Predicate`] and at most one [`SortKey`]. Descriptors are
//! built from a [`Selection`] by [`compose`], which always starts from a
//! cleared descriptor so nothing from an earlier selection carries over.

use std::fmt;
use std::sync::Arc;

use crate::record::{Entity, Field, FieldValue};
use crate::selection::Selection;

// ------------- Predicate -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Equal,
    GreaterThan,
    LessThan,
}
impl Comparison {
    pub const fn operator(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
        }
    }
}

/// A named boolean test over a single venue field.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    name: String,
    field: Field,
    comparison: Comparison,
    operand: FieldValue,
}
impl Predicate {
    pub fn new(name: &str, field: Field, comparison: Comparison, operand: impl Into<FieldValue>) -> Self {
        Self {
            name: name.to_string(),
            field,
            comparison,
            operand: operand.into(),
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn field(&self) -> Field {
        self.field
    }
    pub fn comparison(&self) -> Comparison {
        self.comparison
    }
    pub fn operand(&self) -> &FieldValue {
        &self.operand
    }
    /// The condition with a single positional parameter standing in for the operand.
    pub fn sql(&self) -> String {
        format!("{} {} ?", self.field.column(), self.comparison.operator())
    }
}
impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.comparison.operator(), self.operand)
    }
}

// ------------- SortKey -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Ascending,
    Descending,
}
impl Direction {
    pub const fn reversed(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collation {
    /// Plain value comparison.
    Binary,
    /// Natural, case insensitive text comparison (see `persist::localized_compare`).
    Localized,
}
impl Collation {
    pub const fn sql_name(&self) -> &'static str {
        match self {
            Self::Binary => "BINARY",
            Self::Localized => "LOCALIZED",
        }
    }
}

/// A named ordering rule over a single venue field.
///
/// The record identity is always appended as a final tiebreak in the same
/// direction, so the ordering is total and a reversed key yields exactly
/// the reverse sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortKey {
    name: String,
    field: Field,
    direction: Direction,
    collation: Collation,
}
impl SortKey {
    pub fn new(name: &str, field: Field, direction: Direction, collation: Collation) -> Self {
        Self {
            name: name.to_string(),
            field,
            direction,
            collation,
        }
    }
    pub fn ascending(name: &str, field: Field) -> Self {
        Self::new(name, field, Direction::Ascending, Collation::Binary)
    }
    /// The same ordering rule run backwards, under a new name.
    pub fn reversed(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            field: self.field,
            direction: self.direction.reversed(),
            collation: self.collation,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn field(&self) -> Field {
        self.field
    }
    pub fn direction(&self) -> Direction {
        self.direction
    }
    pub fn collation(&self) -> Collation {
        self.collation
    }
    pub fn sql(&self) -> String {
        format!(
            "{} collate {} {}, id {}",
            self.field.column(),
            self.collation.sql_name(),
            self.direction.keyword(),
            self.direction.keyword()
        )
    }
}
impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction.keyword())
    }
}

// ------------- QueryDescriptor -------------
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDescriptor {
    entity: Entity,
    predicate: Option<Arc<Predicate>>,
    sort_keys: Vec<Arc<SortKey>>,
}
impl QueryDescriptor {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            predicate: None,
            sort_keys: Vec::new(),
        }
    }
    pub fn entity(&self) -> Entity {
        self.entity
    }
    pub fn predicate(&self) -> Option<&Arc<Predicate>> {
        self.predicate.as_ref()
    }
    /// Holds zero or one key, multi-key tiebreak chains are not supported.
    pub fn sort_keys(&self) -> &[Arc<SortKey>] {
        &self.sort_keys
    }
    pub fn clear(&mut self) {
        self.predicate = None;
        self.sort_keys.clear();
    }
    pub fn with_predicate(mut self, predicate: Arc<Predicate>) -> Self {
        self.predicate = Some(predicate);
        self
    }
    pub fn with_sort_key(mut self, sort_key: Arc<SortKey>) -> Self {
        self.sort_keys = vec![sort_key];
        self
    }
    /// Replaces whatever the descriptor held with the given selection.
    pub fn apply(&mut self, selection: &Selection) {
        self.clear();
        if let Some(predicate) = selection.predicate() {
            self.predicate = Some(Arc::clone(predicate));
        }
        if let Some(sort_key) = selection.sort_key() {
            self.sort_keys = vec![Arc::clone(sort_key)];
        }
    }
}
impl fmt::Display for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.entity)?;
        if let Some(predicate) = &self.predicate {
            write!(f, " where {}", predicate)?;
        }
        if let Some(sort_key) = self.sort_keys.first() {
            write!(f, " order by {}", sort_key)?;
        }
        Ok(())
    }
}

/// Builds a fresh descriptor over `entity` for the given selection.
pub fn compose(entity: Entity, selection: &Selection) -> QueryDescriptor {
    let mut descriptor = QueryDescriptor::new(entity);
    descriptor.apply(selection);
    descriptor
}
