use std::cmp::Ordering;
use std::sync::Arc;

use venuefilter::catalog::{self, Catalog};
use venuefilter::executor::QueryExecutor;
use venuefilter::persist::{PersistenceMode, SqliteStore, localized_compare};
use venuefilter::query::QueryDescriptor;
use venuefilter::record::{Entity, Field, NewVenue, PriceTier};

fn setup(venues: &[NewVenue]) -> QueryExecutor {
    let store = SqliteStore::open(PersistenceMode::InMemory).expect("store");
    store.insert_all(venues).expect("insert");
    QueryExecutor::new(Arc::new(store), Entity::Venue)
}

// A(low, 2 offers), B(low, no offers), C(high, 5 offers)
fn abc() -> Vec<NewVenue> {
    vec![
        NewVenue::new("Cha Cha", PriceTier::High).special_count(5).distance(900.0),
        NewVenue::new("Alpha Tea", PriceTier::Low).special_count(2).distance(120.0).tip_count(3),
        NewVenue::new("Bravo Boba", PriceTier::Low).distance(430.0),
    ]
}

fn names(venues: &[venuefilter::record::Venue]) -> Vec<&str> {
    venues.iter().map(|v| v.name.as_str()).collect()
}

#[test]
fn concrete_counts_and_sum() {
    let executor = setup(&abc());
    let catalog = Catalog::new(500.0);
    assert_eq!(executor.count(Some(catalog.predicate(catalog::CHEAP).as_ref())).unwrap(), 2);
    assert_eq!(executor.count(Some(catalog.predicate(catalog::MODERATE).as_ref())).unwrap(), 0);
    assert_eq!(executor.aggregate_sum(Field::SpecialCount).unwrap(), 7);
    assert_eq!(executor.count(Some(catalog.predicate(catalog::WALKING_DISTANCE).as_ref())).unwrap(), 2);
    assert_eq!(executor.count(Some(catalog.predicate(catalog::HAS_USER_TIPS).as_ref())).unwrap(), 1);
}

#[test]
fn offering_deal_fetch() {
    let executor = setup(&abc());
    let catalog = Catalog::new(500.0);
    let unsorted = QueryDescriptor::new(Entity::Venue).with_predicate(catalog.predicate(catalog::OFFERING_DEAL));
    let mut fetched = names(&executor.fetch(&unsorted).unwrap()).into_iter().map(String::from).collect::<Vec<_>>();
    fetched.sort();
    assert_eq!(fetched, vec!["Alpha Tea", "Cha Cha"]);
    let sorted = unsorted.with_sort_key(catalog.sort_key(catalog::NAME_ASCENDING));
    assert_eq!(names(&executor.fetch(&sorted).unwrap()), vec!["Alpha Tea", "Cha Cha"]);
}

#[test]
fn price_tiers_partition_the_venues() {
    let mut venues = abc();
    venues.push(NewVenue::new("Dough & Tea", PriceTier::Medium));
    venues.push(NewVenue::new("Earl's", PriceTier::Medium).special_count(1));
    let executor = setup(&venues);
    let catalog = Catalog::new(500.0);
    let per_tier: u64 = PriceTier::ALL
        .into_iter()
        .map(|tier| executor.count(Some(catalog.tier_predicate(tier).as_ref())).unwrap())
        .sum();
    assert_eq!(per_tier, executor.count(None).unwrap());
    assert_eq!(per_tier, 5);
}

#[test]
fn store_side_sum_matches_client_side_sum() {
    let executor = setup(&abc());
    let all = executor.fetch(&QueryDescriptor::new(Entity::Venue)).unwrap();
    let client_side: i64 = all.iter().map(|v| v.special_count).sum();
    assert_eq!(executor.aggregate_sum(Field::SpecialCount).unwrap(), client_side);
    let aggregate = executor.aggregate("sum_tips", Field::TipCount).unwrap();
    assert_eq!(aggregate.total, all.iter().map(|v| v.tip_count).sum::<i64>());
    assert_eq!(aggregate.name, "sum_tips");
}

#[test]
fn empty_store_reduces_to_zero() {
    let executor = setup(&[]);
    let catalog = Catalog::new(500.0);
    assert_eq!(executor.count(None).unwrap(), 0);
    assert_eq!(executor.count(Some(catalog.predicate(catalog::EXPENSIVE).as_ref())).unwrap(), 0);
    assert_eq!(executor.aggregate_sum(Field::SpecialCount).unwrap(), 0);
    assert!(executor.fetch(&QueryDescriptor::new(Entity::Venue)).unwrap().is_empty());
}

#[test]
#[should_panic(expected = "non-integer")]
fn summing_distance_is_a_programming_error() {
    let executor = setup(&abc());
    let _ = executor.aggregate_sum(Field::Distance);
}

#[test]
fn name_descending_reverses_name_ascending() {
    let names_in = [
        "Zebra", "apple", "Äpfel", "apple", "Item 10", "Item 9", "éclair", "Éclair", "banana", "Apple",
    ];
    let venues: Vec<NewVenue> = names_in.iter().map(|n| NewVenue::new(n, PriceTier::Low)).collect();
    let executor = setup(&venues);
    let catalog = Catalog::new(500.0);
    let ascending = executor
        .fetch(&QueryDescriptor::new(Entity::Venue).with_sort_key(catalog.sort_key(catalog::NAME_ASCENDING)))
        .unwrap();
    let descending = executor
        .fetch(&QueryDescriptor::new(Entity::Venue).with_sort_key(catalog.sort_key(catalog::NAME_DESCENDING)))
        .unwrap();
    let mut reversed: Vec<i64> = ascending.iter().map(|v| v.id).collect();
    reversed.reverse();
    assert_eq!(descending.iter().map(|v| v.id).collect::<Vec<_>>(), reversed);
    let order = names(&ascending);
    let position = |name: &str| order.iter().position(|n| *n == name).unwrap();
    assert!(position("Item 9") < position("Item 10"), "digit runs compare by value");
    assert!(position("apple") < position("banana"));
    assert!(position("banana") < position("Zebra"), "case does not decide the order");
    assert!(position("Äpfel") < position("apple"), "accents sort with their base letter");
    assert!(position("banana") < position("éclair"));
    assert!(position("Éclair") < position("Item 9"));
    assert!(position("éclair") < position("Zebra"));
}

#[test]
fn accented_names_sort_with_their_base_letter() {
    let names_in = ["Zebra Tea", "Éclair Boba", "Apple", "Ämber", "Fig"];
    let venues: Vec<NewVenue> = names_in.iter().map(|n| NewVenue::new(n, PriceTier::Low)).collect();
    let executor = setup(&venues);
    let catalog = Catalog::new(500.0);
    let ascending = executor
        .fetch(&QueryDescriptor::new(Entity::Venue).with_sort_key(catalog.sort_key(catalog::NAME_ASCENDING)))
        .unwrap();
    assert_eq!(names(&ascending), vec!["Ämber", "Apple", "Éclair Boba", "Fig", "Zebra Tea"]);
    let descending = executor
        .fetch(&QueryDescriptor::new(Entity::Venue).with_sort_key(catalog.sort_key(catalog::NAME_DESCENDING)))
        .unwrap();
    assert_eq!(names(&descending), vec!["Zebra Tea", "Fig", "Éclair Boba", "Apple", "Ämber"]);
}

#[test]
fn distance_and_price_sorts() {
    let executor = setup(&abc());
    let catalog = Catalog::new(500.0);
    let by_distance = executor
        .fetch(&QueryDescriptor::new(Entity::Venue).with_sort_key(catalog.sort_key(catalog::DISTANCE)))
        .unwrap();
    assert_eq!(names(&by_distance), vec!["Alpha Tea", "Bravo Boba", "Cha Cha"]);
    let by_price = executor
        .fetch(&QueryDescriptor::new(Entity::Venue).with_sort_key(catalog.sort_key(catalog::PRICE)))
        .unwrap();
    let tiers: Vec<PriceTier> = by_price.iter().map(|v| v.price_tier).collect();
    assert_eq!(tiers, vec![PriceTier::Low, PriceTier::Low, PriceTier::High]);
}

#[test]
fn localized_compare_is_natural_and_case_insensitive() {
    assert_eq!(localized_compare("Item 9", "Item 10"), Ordering::Less);
    assert_eq!(localized_compare("item 010", "Item 9"), Ordering::Greater);
    assert_eq!(localized_compare("apple", "Banana"), Ordering::Less);
    assert_eq!(localized_compare("same", "same"), Ordering::Equal);
    // equal apart from case still has a fixed order
    assert_ne!(localized_compare("Apple", "apple"), Ordering::Equal);
    assert_eq!(localized_compare("Apple", "apple"), localized_compare("apple", "Apple").reverse());
}

#[test]
fn localized_compare_folds_accents() {
    assert_eq!(localized_compare("Éclair", "Fig"), Ordering::Less);
    assert_eq!(localized_compare("Ämber", "Apple"), Ordering::Less);
    assert_eq!(localized_compare("Zebra", "Éclair"), Ordering::Greater);
    // the accented spelling still has a fixed place next to the plain one
    assert_ne!(localized_compare("Eclair", "Éclair"), Ordering::Equal);
    assert_eq!(localized_compare("Eclair", "Éclair"), localized_compare("Éclair", "Eclair").reverse());
}
