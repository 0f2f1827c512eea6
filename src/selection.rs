//! Selection state for the filter screen.
//!
//! One predicate slot and one sort slot. Every tap replaces the slot it
//! belongs to, there is no accumulation and no deselect.

use std::sync::Arc;

use crate::catalog::{self, Catalog};
use crate::query::{Predicate, SortKey};

/// The (predicate, sort key) pair chosen by a user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    predicate: Option<Arc<Predicate>>,
    sort_key: Option<Arc<SortKey>>,
}
impl Selection {
    pub fn new(predicate: Option<Arc<Predicate>>, sort_key: Option<Arc<SortKey>>) -> Self {
        Self { predicate, sort_key }
    }
    pub fn predicate(&self) -> Option<&Arc<Predicate>> {
        self.predicate.as_ref()
    }
    pub fn sort_key(&self) -> Option<&Arc<SortKey>> {
        self.sort_key.as_ref()
    }
    pub fn is_empty(&self) -> bool {
        self.predicate.is_none() && self.sort_key.is_none()
    }
}

// ------------- Menu -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Price,
    Popularity,
    Sort,
}
impl Section {
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Popularity => "popularity",
            Self::Sort => "sort",
        }
    }
}

/// The rows of the filter screen, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuRow {
    Cheap,
    Moderate,
    Expensive,
    OfferingDeal,
    WalkingDistance,
    HasUserTips,
    NameAscending,
    NameDescending,
    Distance,
    Price,
}

/// What a row selects, by catalog name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Predicate(&'static str),
    SortKey(&'static str),
}

impl MenuRow {
    pub const ALL: [MenuRow; 10] = [
        Self::Cheap,
        Self::Moderate,
        Self::Expensive,
        Self::OfferingDeal,
        Self::WalkingDistance,
        Self::HasUserTips,
        Self::NameAscending,
        Self::NameDescending,
        Self::Distance,
        Self::Price,
    ];

    pub const fn section(&self) -> Section {
        match self {
            Self::Cheap | Self::Moderate | Self::Expensive => Section::Price,
            Self::OfferingDeal | Self::WalkingDistance | Self::HasUserTips => Section::Popularity,
            Self::NameAscending | Self::NameDescending | Self::Distance | Self::Price => Section::Sort,
        }
    }
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Cheap => "$",
            Self::Moderate => "$$",
            Self::Expensive => "$$$",
            Self::OfferingDeal => "Offering a deal",
            Self::WalkingDistance => "Within walking distance",
            Self::HasUserTips => "Has user tips",
            Self::NameAscending => "Name (A-Z)",
            Self::NameDescending => "Name (Z-A)",
            Self::Distance => "Distance",
            Self::Price => "Price",
        }
    }
    pub const fn entry(&self) -> MenuEntry {
        match self {
            Self::Cheap => MenuEntry::Predicate(catalog::CHEAP),
            Self::Moderate => MenuEntry::Predicate(catalog::MODERATE),
            Self::Expensive => MenuEntry::Predicate(catalog::EXPENSIVE),
            Self::OfferingDeal => MenuEntry::Predicate(catalog::OFFERING_DEAL),
            Self::WalkingDistance => MenuEntry::Predicate(catalog::WALKING_DISTANCE),
            Self::HasUserTips => MenuEntry::Predicate(catalog::HAS_USER_TIPS),
            Self::NameAscending => MenuEntry::SortKey(catalog::NAME_ASCENDING),
            Self::NameDescending => MenuEntry::SortKey(catalog::NAME_DESCENDING),
            Self::Distance => MenuEntry::SortKey(catalog::DISTANCE),
            Self::Price => MenuEntry::SortKey(catalog::PRICE),
        }
    }
    pub fn in_section(section: Section) -> impl Iterator<Item = MenuRow> {
        Self::ALL.into_iter().filter(move |row| row.section() == section)
    }
}

// ------------- SelectionState -------------
#[derive(Debug, Default)]
pub struct SelectionState {
    current: Selection,
}
impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn select_predicate(&mut self, predicate: Option<Arc<Predicate>>) {
        self.current.predicate = predicate;
    }
    pub fn select_sort_key(&mut self, sort_key: Option<Arc<SortKey>>) {
        self.current.sort_key = sort_key;
    }
    /// Selects whatever the tapped row stands for.
    pub fn tap(&mut self, row: MenuRow, catalog: &Catalog) {
        match row.entry() {
            MenuEntry::Predicate(name) => self.select_predicate(Some(catalog.predicate(name))),
            MenuEntry::SortKey(name) => self.select_sort_key(Some(catalog.sort_key(name))),
        }
    }
    /// Whether the row should carry a checkmark.
    pub fn is_checked(&self, row: MenuRow) -> bool {
        match row.entry() {
            MenuEntry::Predicate(name) => self.current.predicate().is_some_and(|p| p.name() == name),
            MenuEntry::SortKey(name) => self.current.sort_key().is_some_and(|s| s.name() == name),
        }
    }
    pub fn current(&self) -> Selection {
        self.current.clone()
    }
    pub fn into_selection(self) -> Selection {
        self.current
    }
}
