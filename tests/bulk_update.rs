use std::sync::Arc;

use venuefilter::executor::QueryExecutor;
use venuefilter::mutator::{Assignment, BulkMutator};
use venuefilter::persist::{PersistenceMode, SqliteStore, Store};
use venuefilter::query::{Comparison, Predicate, QueryDescriptor};
use venuefilter::record::{Entity, Field, NewVenue, PriceTier};

fn setup() -> Arc<dyn Store> {
    let store = SqliteStore::open(PersistenceMode::InMemory).expect("store");
    store
        .insert_all(&[
            NewVenue::new("Alpha Tea", PriceTier::Low),
            NewVenue::new("Bravo Boba", PriceTier::Medium),
            NewVenue::new("Cha Cha", PriceTier::High),
            NewVenue::new("Dough & Tea", PriceTier::Low),
        ])
        .expect("insert");
    Arc::new(store)
}

#[test]
fn favorites_normalized_for_every_venue() {
    let store = setup();
    let mutator = BulkMutator::new(Arc::clone(&store));
    assert_eq!(mutator.normalize_favorites().unwrap(), 4);
    let executor = QueryExecutor::new(store, Entity::Venue);
    let favorite = Arc::new(Predicate::new("favorite", Field::Favorite, Comparison::Equal, true));
    let favorites = executor.fetch(&QueryDescriptor::new(Entity::Venue).with_predicate(favorite)).unwrap();
    assert_eq!(favorites.len() as u64, executor.count(None).unwrap());
    assert!(favorites.iter().all(|v| v.favorite));
    // running it again touches the same rows
    assert_eq!(mutator.normalize_favorites().unwrap(), 4);
}

#[test]
fn several_fields_in_one_update() {
    let store = setup();
    let mutator = BulkMutator::new(Arc::clone(&store));
    let affected = mutator
        .bulk_update(
            Entity::Venue,
            &[Assignment::new(Field::SpecialCount, 3i64), Assignment::new(Field::TipCount, 1i64)],
        )
        .unwrap();
    assert_eq!(affected, 4);
    let executor = QueryExecutor::new(store, Entity::Venue);
    assert_eq!(executor.aggregate_sum(Field::SpecialCount).unwrap(), 12);
    assert_eq!(executor.aggregate_sum(Field::TipCount).unwrap(), 4);
}

#[test]
fn nothing_to_assign_touches_nothing() {
    let mutator = BulkMutator::new(setup());
    assert_eq!(mutator.bulk_update(Entity::Venue, &[]).unwrap(), 0);
}

#[test]
fn empty_store_reports_zero_affected() {
    let store: Arc<dyn Store> = Arc::new(SqliteStore::open(PersistenceMode::InMemory).unwrap());
    assert_eq!(BulkMutator::new(store).normalize_favorites().unwrap(), 0);
}
