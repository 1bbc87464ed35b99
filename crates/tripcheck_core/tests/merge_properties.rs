use std::collections::HashSet;
use tripcheck_core::{merge, ChecklistItem};

const TITLES: [&str; 4] = ["Passport", "Adapter", "Umbrella", "Cash"];

fn subsets() -> Vec<Vec<&'static str>> {
    (0..(1u32 << TITLES.len()))
        .map(|mask| {
            TITLES
                .iter()
                .enumerate()
                .filter(|(index, _)| mask & (1 << index) != 0)
                .map(|(_, title)| *title)
                .collect()
        })
        .collect()
}

fn orderings() -> Vec<Vec<&'static str>> {
    let mut all = Vec::new();
    for subset in subsets() {
        let mut reversed = subset.clone();
        reversed.reverse();
        all.push(subset);
        all.push(reversed);
    }
    all
}

fn items(prefix: &str, titles: &[&str]) -> Vec<ChecklistItem> {
    titles
        .iter()
        .map(|title| ChecklistItem::new(format!("{prefix}_{title}"), *title))
        .collect()
}

fn titles(items: &[ChecklistItem]) -> Vec<&str> {
    items.iter().map(|item| item.title.as_str()).collect()
}

#[test]
fn merge_keeps_base_order_and_appends_override_only_items_in_order() {
    for base_titles in orderings() {
        for override_titles in orderings() {
            let base = items("base", &base_titles);
            let overrides = items("override", &override_titles);
            let merged = merge(&base, &overrides);

            assert_eq!(&titles(&merged)[..base.len()], base_titles.as_slice());

            let expected_tail: Vec<&str> = override_titles
                .iter()
                .copied()
                .filter(|title| !base_titles.contains(title))
                .collect();
            assert_eq!(&titles(&merged)[base.len()..], expected_tail.as_slice());

            for (position, item) in merged.iter().take(base.len()).enumerate() {
                let substituted = override_titles.iter().any(|title| *title == item.title);
                let expected_prefix = if substituted { "override_" } else { "base_" };
                assert!(
                    item.id.starts_with(expected_prefix),
                    "position {position} has id {} for base {base_titles:?} override {override_titles:?}",
                    item.id
                );
            }
        }
    }
}

#[test]
fn merge_never_repeats_titles() {
    for base_titles in orderings() {
        for override_titles in orderings() {
            let merged = merge(
                &items("base", &base_titles),
                &items("override", &override_titles),
            );
            let unique: HashSet<&str> = titles(&merged).into_iter().collect();
            assert_eq!(unique.len(), merged.len());
        }
    }
}

#[test]
fn merge_identity_laws_hold() {
    for titles_list in orderings() {
        let base = items("base", &titles_list);
        assert_eq!(merge(&base, &[]), base);

        let overrides = items("override", &titles_list);
        assert_eq!(merge(&[], &overrides), overrides);
    }
}

#[test]
fn merge_with_empty_base_drops_malformed_overrides() {
    let overrides = vec![
        ChecklistItem::new("", "No id"),
        ChecklistItem::new("ok", "Fine"),
        ChecklistItem::new("blank", ""),
    ];
    let merged = merge(&[], &overrides);
    assert_eq!(titles(&merged), vec!["Fine"]);

    let all_bad = vec![ChecklistItem::new("", "")];
    assert!(merge(&[], &all_bad).is_empty());
}

#[test]
fn merge_skips_malformed_base_items_when_overlaying() {
    let base = vec![
        ChecklistItem::new("a", "A"),
        ChecklistItem::new("", "Ghost"),
        ChecklistItem::new("b", "B"),
    ];
    let overrides = vec![ChecklistItem::new("c", "C")];
    let merged = merge(&base, &overrides);
    assert_eq!(titles(&merged), vec!["A", "B", "C"]);
}

#[test]
fn merge_with_empty_base_keeps_overrides_despite_repeated_ids() {
    let overrides = vec![ChecklistItem::new("a", "X"), ChecklistItem::new("a", "Y")];
    let merged = merge(&[], &overrides);
    assert_eq!(titles(&merged), vec!["X"]);
    assert_eq!(merged[0].id, "a");
}

#[test]
fn id_collision_skips_only_the_colliding_override() {
    let base = vec![
        ChecklistItem::new("pouch", "Pouch"),
        ChecklistItem::new("cash", "Cash"),
    ];
    let overrides = vec![
        ChecklistItem::new("pouch", "Waterproof pouch"),
        ChecklistItem::new("umbrella_extra", "Umbrella"),
        ChecklistItem::new("cash2", "Cash").with_description("local"),
    ];

    let merged = merge(&base, &overrides);
    let ids: Vec<&str> = merged.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["pouch", "cash2", "umbrella_extra"]);
    assert_eq!(merged[0].title, "Pouch");
    assert_eq!(merged[1].description, "local");
}
