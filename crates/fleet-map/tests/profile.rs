use fleet_map::{MappingEngine, MemoryProfileStore, ProfileStore};
use fleet_model::{ColumnMapping, FieldType, TargetField};

#[test]
fn saved_profile_loads_the_exact_mapping() {
    let fields = vec![
        TargetField::new("vin", "VIN", FieldType::String).with_required(true),
        TargetField::new("make", "Make", FieldType::String),
        TargetField::new("model", "Model", FieldType::String),
    ];
    let headers = ["VIN", "Make", "Model"];
    let engine = MappingEngine::new(&fields);
    let mut mapping = engine.compute(&headers);
    assert_eq!(mapping.len(), 3);

    // A cleared entry must stay cleared after the round trip.
    engine.assign(&mut mapping, &headers, "Model", None).unwrap();

    let store = MemoryProfileStore::new();
    let id = store.save("Truck list", "trucks", &mapping).unwrap();
    let loaded = store.load("trucks", &id).unwrap();

    assert_eq!(loaded.name, "Truck list");
    assert_eq!(loaded.mapping, mapping);
    assert!(!loaded.mapping.contains_header("Model"));
}

#[test]
fn ids_are_unique_per_save() {
    let store = MemoryProfileStore::new();
    let a = store.save("A", "drivers", &ColumnMapping::new()).unwrap();
    let b = store.save("A", "drivers", &ColumnMapping::new()).unwrap();
    assert_ne!(a, b);
    assert_eq!(store.list("drivers").unwrap().len(), 2);
}
