use venuefilter::catalog::{self, DEFAULT_WALKING_DISTANCE};
use venuefilter::persist::PersistenceMode;
use venuefilter::record::FieldValue;
use venuefilter::settings::Settings;

#[test]
fn defaults_without_a_file() {
    let settings = Settings::load_from("no_such_venuefilter_settings").expect("settings");
    assert_eq!(settings.catalog.walking_distance, DEFAULT_WALKING_DISTANCE);
    assert!(!settings.startup.normalize_favorites);
    assert!(settings.startup.seed.is_none());
    assert_eq!(settings.persistence_mode(), PersistenceMode::InMemory);
}

#[test]
fn file_overrides_defaults() {
    let name = "test_venuefilter_settings";
    let path = format!("{}.toml", name);
    std::fs::write(
        &path,
        "[database]\npath = \"venues.db\"\n\n[catalog]\nwalking_distance = 350.0\n\n[startup]\nnormalize_favorites = true\n",
    )
    .unwrap();
    let settings = Settings::load_from(name);
    let _ = std::fs::remove_file(&path);
    let settings = settings.expect("settings");
    assert_eq!(settings.persistence_mode(), PersistenceMode::File("venues.db".to_string()));
    assert!(settings.startup.normalize_favorites);
    let catalog = settings.catalog();
    assert_eq!(catalog.predicate(catalog::WALKING_DISTANCE).operand(), &FieldValue::Real(350.0));
}
