//! Venuefilter – the query side of a venue finder.
//!
//! A list of venues is filtered and ordered by choices made on a filter
//! screen. This crate is everything between those choices and the store:
//! * [`catalog`] – the fixed, memoized set of predicates and sort keys.
//! * [`selection`] – the one-predicate, one-sort-key selection made on the
//!   filter screen, and the menu rows that drive it.
//! * [`notifier`] – one-shot hand-off of a confirmed selection.
//! * [`query`] – predicates, sort keys, and [`query::compose`], which turns a
//!   selection into a [`query::QueryDescriptor`].
//! * [`executor`] – blocking, asynchronous, count and sum queries.
//! * [`mutator`] – batch assignment of a field across all records.
//! * [`list`] – the owner of the displayed list, which re-fetches on every
//!   confirmed selection and never lets a stale fetch win.
//! * [`persist`] – the [`persist::Store`] handle and its SQLite implementation.
//!
//! ## Reductions happen in the store
//! Counting the venues of a price tier, or summing the offers across all
//! venues, never loads venues. The store answers with a single number and
//! an empty store answers zero.
//!
//! ## Quick Start
//! ```
//! use std::sync::Arc;
//! use venuefilter::{catalog::{self, Catalog}, executor::QueryExecutor};
//! use venuefilter::persist::{PersistenceMode, SqliteStore};
//! use venuefilter::record::{Entity, NewVenue, PriceTier};
//! let store = SqliteStore::open(PersistenceMode::InMemory).unwrap();
//! store.insert(&NewVenue::new("Boba Bar", PriceTier::Low).special_count(2)).unwrap();
//! let executor = QueryExecutor::new(Arc::new(store), Entity::Venue);
//! let cheap = Catalog::global().predicate(catalog::CHEAP);
//! assert_eq!(executor.count(Some(cheap.as_ref())).unwrap(), 1);
//! ```

pub mod catalog;
pub mod error;
pub mod executor;
pub mod list;
pub mod mutator;
pub mod notifier;
pub mod persist;
pub mod query;
pub mod record;
pub mod selection;
pub mod settings;
pub mod summary;

pub use error::{Result, StoreError};
