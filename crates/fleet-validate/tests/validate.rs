use chrono::{TimeZone, Utc};
use fleet_model::{ColumnMapping, FieldType, FixedValues, TargetField};
use fleet_validate::{Finding, use_default, validate};
use proptest::prelude::*;

fn catalog(keys: &[String]) -> Vec<TargetField> {
    keys.iter()
        .map(|k| {
            TargetField::new(k.clone(), k.to_uppercase(), FieldType::String).with_required(true)
        })
        .collect()
}

proptest! {
    #[test]
    fn fixed_value_or_column_satisfies_required(
        keys in proptest::collection::btree_set("[a-z]{3,6}", 1..6),
        pick in any::<prop::sample::Index>(),
        via_fixed in any::<bool>(),
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let fields = catalog(&keys);
        let target = pick.get(&keys).clone();

        let mut mapping = ColumnMapping::new();
        let mut fixed = FixedValues::new();
        if via_fixed {
            fixed.set(target.clone(), "N/A");
        } else {
            mapping.set("Source", target.clone());
        }

        let covered = validate(&fields, &mapping, &fixed, None);
        prop_assert!(!covered.missing_required_keys().contains(&target.as_str()));
        prop_assert_eq!(covered.missing_required.len(), keys.len() - 1);

        mapping.clear("Source");
        fixed.remove(&target);
        let uncovered = validate(&fields, &mapping, &fixed, None);
        prop_assert!(uncovered.missing_required_keys().contains(&target.as_str()));
        prop_assert_eq!(uncovered.missing_required.len(), keys.len());
    }
}

#[test]
fn use_na_clears_the_blocking_finding() {
    let fields = vec![
        TargetField::new("vin", "VIN", FieldType::String).with_required(true),
        TargetField::new("make", "Make", FieldType::String).with_required(true),
    ];
    let mapping: ColumnMapping = [("Make", "make")].into_iter().collect();
    let mut fixed = FixedValues::new();

    let before = validate(&fields, &mapping, &fixed, None);
    assert!(before.is_blocked());
    assert_eq!(
        before.blocking().collect::<Vec<_>>(),
        vec![&Finding::RequiredMissing {
            key: "vin".into(),
            label: "VIN".into()
        }]
    );

    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(use_default(&mut fixed, &fields, "vin", now).unwrap(), "N/A");

    let after = validate(&fields, &mapping, &fixed, None);
    assert!(!after.is_blocked());
    assert!(after.missing_required.is_empty());
}
