use std::collections::BTreeSet;
use tripcheck_core::{
    builtin_dataset, compose_checklist, compose_sections, ChecklistItem, CountryOverrideSet,
    Dataset, DurationSelection, DurationSlot, Section,
};

fn packing_only() -> Vec<Section> {
    vec![Section::new(
        "packing",
        "Packing",
        vec![
            ChecklistItem::new("clothing", "Clothing"),
            ChecklistItem::new("underwear", "Underwear"),
            ChecklistItem::new("pouch", "Pouch").with_description("generic"),
        ],
    )]
}

fn ids(section: &Section) -> Vec<&str> {
    section.items.iter().map(|item| item.id.as_str()).collect()
}

#[test]
fn duration_then_override_produces_expected_order() {
    let mut overrides = CountryOverrideSet::new();
    overrides.insert(
        "packing".to_string(),
        vec![
            ChecklistItem::new("pouch", "Pouch").with_description("waterproof"),
            ChecklistItem::new("umbrella_extra", "Umbrella"),
        ],
    );

    let composed = compose_sections(
        &packing_only(),
        Some(&overrides),
        &DurationSlot::default(),
        Some(DurationSelection::parse("2-3").unwrap()),
    );

    assert_eq!(
        ids(&composed[0]),
        vec![
            "clothing",
            "duration_underwear",
            "duration_socks",
            "pouch",
            "umbrella_extra"
        ]
    );
    assert_eq!(composed[0].items[3].description, "waterproof");
}

#[test]
fn dataset_with_unknown_country_returns_base_schema() {
    let dataset = builtin_dataset();
    let composed = compose_checklist(dataset, Some("atlantis"), None);
    assert_eq!(composed, dataset.sections);

    let no_country = compose_checklist(dataset, None, None);
    assert_eq!(no_country, dataset.sections);
}

#[test]
fn builtin_japan_checklist_overlays_country_items() {
    let dataset = builtin_dataset();
    let composed = compose_checklist(dataset, Some("japan"), None);

    let money = composed.iter().find(|section| section.id == "money").unwrap();
    assert_eq!(
        ids(money),
        vec!["credit_card", "local_cash", "exchange_plan", "ic_card"]
    );
    assert!(money.items[1].description.contains("yen"));

    let section_ids: Vec<&str> = composed.iter().map(|section| section.id.as_str()).collect();
    let base_ids: Vec<&str> = dataset
        .sections
        .iter()
        .map(|section| section.id.as_str())
        .collect();
    assert_eq!(section_ids, base_ids);
}

#[test]
fn composed_builtin_checklists_have_unique_ids() {
    let dataset = builtin_dataset();
    let countries: Vec<&str> = dataset.countries().collect();
    for country in countries {
        for label in ["1", "2-3", "4-6", "7+"] {
            let composed =
                compose_checklist(dataset, Some(country), Some(DurationSelection::parse(label).unwrap()));
            let mut seen = BTreeSet::new();
            for item in composed.iter().flat_map(|section| section.items.iter()) {
                assert!(seen.insert(item.id.clone()), "{country}/{label} repeats {}", item.id);
            }
            assert!(!seen.contains("underwear"));
        }
    }
}

#[test]
fn missing_anchor_in_dataset_prepends_duration_items() {
    let json = r#"{
        "sections": [{ "id": "packing", "title": "Packing", "items": [
            { "id": "underwear", "title": "Underwear" },
            { "id": "toiletries", "title": "Toiletries" }
        ] }]
    }"#;
    let dataset = Dataset::from_json_str(json).unwrap();
    let composed = compose_checklist(&dataset, None, Some(DurationSelection::parse("1").unwrap()));
    assert_eq!(
        ids(&composed[0]),
        vec!["duration_underwear", "duration_socks", "toiletries"]
    );
}
