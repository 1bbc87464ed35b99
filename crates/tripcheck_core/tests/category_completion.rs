use std::collections::BTreeSet;
use tripcheck_core::{
    builtin_dataset, category_report, compose_checklist, is_category_complete, match_category,
    ChecklistItem, Section,
};

fn checked(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

#[test]
fn passport_category_completes_when_checked() {
    let sections = vec![Section::new(
        "documents",
        "Documents",
        vec![ChecklistItem::new("p1", "Passport")],
    )];
    let patterns = vec!["Passport".to_string()];
    assert!(is_category_complete(&patterns, &sections, &checked(&["p1"])));
    assert!(!is_category_complete(&patterns, &sections, &BTreeSet::new()));
}

#[test]
fn empty_patterns_are_never_complete() {
    let sections = builtin_dataset().sections.clone();
    let every_id: BTreeSet<String> = sections
        .iter()
        .flat_map(|section| section.items.iter())
        .map(|item| item.id.clone())
        .collect();
    assert!(!is_category_complete(&[], &sections, &every_id));
    assert!(!is_category_complete(&[], &[], &BTreeSet::new()));
    assert!(match_category(&[], &sections).is_empty());
}

#[test]
fn category_matching_uses_substrings_across_sections() {
    let dataset = builtin_dataset();
    let sections = compose_checklist(dataset, Some("korea"), None);
    let patterns = vec!["Power".to_string(), "Mobile data".to_string()];
    let matched: Vec<&str> = match_category(&patterns, &sections)
        .iter()
        .map(|item| item.id.as_str())
        .collect();
    assert_eq!(matched, vec!["mobile_data", "power_adapter", "power_bank"]);
}

#[test]
fn report_counts_completed_categories_for_composed_checklist() {
    let dataset = builtin_dataset();
    let sections = compose_checklist(dataset, Some("japan"), None);
    let checked = checked(&["mobile_data", "power_adapter", "power_bank", "passport"]);

    let report = category_report(&dataset.categories, &sections, &checked);
    assert_eq!(report.total, dataset.categories.len());
    assert_eq!(report.completed, 1);

    let connected = report
        .categories
        .iter()
        .find(|status| status.id == "staying_connected")
        .unwrap();
    assert!(connected.completed);
    assert_eq!(connected.checked_count, 3);

    let customs = report
        .categories
        .iter()
        .find(|status| status.id == "local_customs")
        .unwrap();
    assert!(!customs.completed);
    assert!(customs.matched_ids.is_empty());
}
