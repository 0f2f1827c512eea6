use venuefilter::catalog::{self, Catalog};
use venuefilter::query::{QueryDescriptor, compose};
use venuefilter::record::Entity;
use venuefilter::selection::Selection;

#[test]
fn empty_selection_composes_to_a_bare_descriptor() {
    let descriptor = compose(Entity::Venue, &Selection::default());
    assert_eq!(descriptor.entity(), Entity::Venue);
    assert!(descriptor.predicate().is_none());
    assert!(descriptor.sort_keys().is_empty());
}

#[test]
fn sort_key_is_attached_as_a_single_element_list() {
    let catalog = Catalog::new(500.0);
    let selection = Selection::new(None, Some(catalog.sort_key(catalog::PRICE)));
    let descriptor = compose(Entity::Venue, &selection);
    assert_eq!(descriptor.sort_keys().len(), 1);
    assert_eq!(descriptor.sort_keys()[0].name(), catalog::PRICE);
}

#[test]
fn recomposing_replaces_the_previous_predicate() {
    let catalog = Catalog::new(500.0);
    let first = Selection::new(Some(catalog.predicate(catalog::CHEAP)), Some(catalog.sort_key(catalog::DISTANCE)));
    let second = Selection::new(Some(catalog.predicate(catalog::OFFERING_DEAL)), None);
    let mut descriptor = compose(Entity::Venue, &first);
    assert_eq!(descriptor.predicate().map(|p| p.name()), Some(catalog::CHEAP));
    // the same descriptor reused for the next confirmation
    descriptor.apply(&second);
    assert_eq!(descriptor.predicate(), Some(&catalog.predicate(catalog::OFFERING_DEAL)));
    assert!(descriptor.sort_keys().is_empty(), "sort key of the earlier selection must not survive");
    assert_eq!(descriptor, compose(Entity::Venue, &second));
}

#[test]
fn clearing_a_built_descriptor() {
    let catalog = Catalog::new(500.0);
    let mut descriptor = QueryDescriptor::new(Entity::Venue)
        .with_predicate(catalog.predicate(catalog::HAS_USER_TIPS))
        .with_sort_key(catalog.sort_key(catalog::NAME_ASCENDING));
    descriptor.clear();
    assert_eq!(descriptor, QueryDescriptor::new(Entity::Venue));
}

#[test]
fn descriptor_reads_like_a_query() {
    let catalog = Catalog::new(500.0);
    let descriptor = QueryDescriptor::new(Entity::Venue)
        .with_predicate(catalog.predicate(catalog::WALKING_DISTANCE))
        .with_sort_key(catalog.sort_key(catalog::NAME_DESCENDING));
    assert_eq!(descriptor.to_string(), "Venue where distance < 500 order by name desc");
}
