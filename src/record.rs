// used for persistence
use rusqlite::Row;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

// seeds are read from JSON
use serde::{Deserialize, Serialize};

// used to print out readable forms of the model
use std::fmt;

// ------------- Entity --------------
/// The record types a query can be based on. Venues are the only stored
/// entity, but descriptors carry their base type explicitly so that a
/// descriptor is self-contained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Venue,
}
impl Entity {
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Venue => "venue",
        }
    }
}
impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Venue => write!(f, "Venue"),
        }
    }
}

// ------------- PriceTier --------------
/// The three ordered price classifications. They are stored as their
/// symbol, and since `$` < `$$` < `$$$` as text, sorting on the stored
/// column yields tier order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceTier {
    #[serde(rename = "$")]
    Low,
    #[serde(rename = "$$")]
    Medium,
    #[serde(rename = "$$$")]
    High,
}
impl PriceTier {
    pub const ALL: [PriceTier; 3] = [Self::Low, Self::Medium, Self::High];

    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Low => "$",
            Self::Medium => "$$",
            Self::High => "$$$",
        }
    }
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "$" => Some(Self::Low),
            "$$" => Some(Self::Medium),
            "$$$" => Some(Self::High),
            _ => None,
        }
    }
}
impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
impl ToSql for PriceTier {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.symbol()))
    }
}
impl FromSql for PriceTier {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        PriceTier::from_symbol(value.as_str()?).ok_or(FromSqlError::InvalidType)
    }
}

// ------------- Field --------------
/// The venue attributes queries can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    PriceTier,
    SpecialCount,
    Distance,
    TipCount,
    Favorite,
}
impl Field {
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::PriceTier => "price_tier",
            Self::SpecialCount => "special_count",
            Self::Distance => "distance",
            Self::TipCount => "tip_count",
            Self::Favorite => "favorite",
        }
    }
    /// Fields whose store-side sum is an integer.
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::SpecialCount | Self::TipCount | Self::Favorite)
    }
}
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

// ------------- FieldValue --------------
/// A typed operand, used both as the right hand side of a predicate and
/// as the new value of a bulk assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    Tier(PriceTier),
}
impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Self::Integer(v) => v.to_sql(),
            Self::Real(v) => v.to_sql(),
            Self::Text(v) => v.to_sql(),
            Self::Bool(v) => v.to_sql(),
            Self::Tier(v) => v.to_sql(),
        }
    }
}
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{}", v),
            Self::Real(v) => write!(f, "{}", v),
            Self::Text(v) => write!(f, "\"{}\"", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Tier(v) => write!(f, "\"{}\"", v),
        }
    }
}
impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}
impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}
impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}
impl From<PriceTier> for FieldValue {
    fn from(v: PriceTier) -> Self {
        Self::Tier(v)
    }
}
impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

// ------------- Venue --------------
/// A venue as materialized by a fetch. The store owns the data, this is
/// only a transient copy handed to whoever asked for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub price_tier: PriceTier,
    pub special_count: i64,
    pub distance: f64,
    pub tip_count: i64,
    pub favorite: bool,
}
impl Venue {
    pub(crate) const COLUMNS: &'static str =
        "id, name, price_tier, special_count, distance, tip_count, favorite";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            price_tier: row.get(2)?,
            special_count: row.get(3)?,
            distance: row.get(4)?,
            tip_count: row.get(5)?,
            favorite: row.get(6)?,
        })
    }
}
impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.price_tier)
    }
}

/// A venue that has not been stored yet, also the shape of a seed entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVenue {
    pub name: String,
    pub price_tier: PriceTier,
    #[serde(default)]
    pub special_count: i64,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub tip_count: i64,
    #[serde(default)]
    pub favorite: bool,
}
impl NewVenue {
    pub fn new(name: &str, price_tier: PriceTier) -> Self {
        Self {
            name: name.to_string(),
            price_tier,
            special_count: 0,
            distance: 0.0,
            tip_count: 0,
            favorite: false,
        }
    }
    pub fn special_count(mut self, special_count: i64) -> Self {
        self.special_count = special_count;
        self
    }
    pub fn distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }
    pub fn tip_count(mut self, tip_count: i64) -> Self {
        self.tip_count = tip_count;
        self
    }
}
