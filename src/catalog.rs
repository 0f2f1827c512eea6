// The closed set of predicates and sort keys offered to the selection UI.
// Entries are built on first request and kept, every later request for
// the same name hands out the same instance.
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::BuildHasherDefault;
use std::sync::{Arc, PoisonError, RwLock};

use lazy_static::lazy_static;
use seahash::SeaHasher;

use crate::query::{Collation, Comparison, Direction, Predicate, SortKey};
use crate::record::{Field, PriceTier};

pub type CatalogHasher = BuildHasherDefault<SeaHasher>;

// predicate names
pub const CHEAP: &str = "cheap";
pub const MODERATE: &str = "moderate";
pub const EXPENSIVE: &str = "expensive";
pub const OFFERING_DEAL: &str = "offering_deal";
pub const WALKING_DISTANCE: &str = "walking_distance";
pub const HAS_USER_TIPS: &str = "has_user_tips";
// sort key names
pub const NAME_ASCENDING: &str = "name_ascending";
pub const NAME_DESCENDING: &str = "name_descending";
pub const DISTANCE: &str = "distance";
pub const PRICE: &str = "price";

pub const PREDICATES: [&str; 6] = [CHEAP, MODERATE, EXPENSIVE, OFFERING_DEAL, WALKING_DISTANCE, HAS_USER_TIPS];
pub const SORT_KEYS: [&str; 4] = [NAME_ASCENDING, NAME_DESCENDING, DISTANCE, PRICE];

pub const DEFAULT_WALKING_DISTANCE: f64 = 500.0;

lazy_static! {
    static ref GLOBAL: Catalog = Catalog::new(DEFAULT_WALKING_DISTANCE);
}

#[derive(Debug)]
pub struct Catalog {
    walking_distance: f64,
    predicates: RwLock<HashMap<String, Arc<Predicate>, CatalogHasher>>,
    sort_keys: RwLock<HashMap<String, Arc<SortKey>, CatalogHasher>>,
}
impl Catalog {
    /// A catalog whose walking distance predicate uses the given threshold.
    pub fn new(walking_distance: f64) -> Self {
        Self {
            walking_distance,
            predicates: RwLock::new(HashMap::default()),
            sort_keys: RwLock::new(HashMap::default()),
        }
    }
    /// The process wide catalog, using the default walking distance.
    pub fn global() -> &'static Catalog {
        &GLOBAL
    }
    pub fn walking_distance(&self) -> f64 {
        self.walking_distance
    }

    /// # Panics
    /// If `name` is not one of [`PREDICATES`].
    pub fn predicate(&self, name: &str) -> Arc<Predicate> {
        if let Some(kept) = self.predicates.read().unwrap_or_else(PoisonError::into_inner).get(name) {
            return Arc::clone(kept);
        }
        let built = self
            .build_predicate(name)
            .unwrap_or_else(|| panic!("Unknown predicate '{}' requested from the catalog", name));
        keep(&self.predicates, name, built)
    }

    /// # Panics
    /// If `name` is not one of [`SORT_KEYS`].
    pub fn sort_key(&self, name: &str) -> Arc<SortKey> {
        if let Some(kept) = self.sort_keys.read().unwrap_or_else(PoisonError::into_inner).get(name) {
            return Arc::clone(kept);
        }
        // built outside of the lock, since the descending name key asks for the ascending one
        let built = self
            .build_sort_key(name)
            .unwrap_or_else(|| panic!("Unknown sort key '{}' requested from the catalog", name));
        keep(&self.sort_keys, name, built)
    }

    pub fn tier_predicate(&self, tier: PriceTier) -> Arc<Predicate> {
        match tier {
            PriceTier::Low => self.predicate(CHEAP),
            PriceTier::Medium => self.predicate(MODERATE),
            PriceTier::High => self.predicate(EXPENSIVE),
        }
    }

    /// Number of entries built so far.
    pub fn len(&self) -> usize {
        self.predicates.read().unwrap_or_else(PoisonError::into_inner).len()
            + self.sort_keys.read().unwrap_or_else(PoisonError::into_inner).len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn build_predicate(&self, name: &str) -> Option<Predicate> {
        let predicate = match name {
            CHEAP => Predicate::new(name, Field::PriceTier, Comparison::Equal, PriceTier::Low),
            MODERATE => Predicate::new(name, Field::PriceTier, Comparison::Equal, PriceTier::Medium),
            EXPENSIVE => Predicate::new(name, Field::PriceTier, Comparison::Equal, PriceTier::High),
            OFFERING_DEAL => Predicate::new(name, Field::SpecialCount, Comparison::GreaterThan, 0i64),
            WALKING_DISTANCE => {
                Predicate::new(name, Field::Distance, Comparison::LessThan, self.walking_distance)
            }
            HAS_USER_TIPS => Predicate::new(name, Field::TipCount, Comparison::GreaterThan, 0i64),
            _ => return None,
        };
        Some(predicate)
    }

    fn build_sort_key(&self, name: &str) -> Option<SortKey> {
        let sort_key = match name {
            NAME_ASCENDING => {
                SortKey::new(name, Field::Name, Direction::Ascending, Collation::Localized)
            }
            NAME_DESCENDING => self.sort_key(NAME_ASCENDING).reversed(name),
            DISTANCE => SortKey::ascending(name, Field::Distance),
            PRICE => SortKey::ascending(name, Field::PriceTier),
            _ => return None,
        };
        Some(sort_key)
    }
}

// Whoever stored first wins, so concurrent first requests still share one instance.
fn keep<T>(kept: &RwLock<HashMap<String, Arc<T>, CatalogHasher>>, name: &str, built: T) -> Arc<T> {
    let mut kept = kept.write().unwrap_or_else(PoisonError::into_inner);
    match kept.entry(name.to_string()) {
        Entry::Occupied(e) => Arc::clone(e.get()),
        Entry::Vacant(e) => Arc::clone(e.insert(Arc::new(built))),
    }
}
