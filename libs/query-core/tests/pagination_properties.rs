//! Properties of the filter → sort → page pipeline over a larger collection.

use query_core::{execute, Filter, PageRequest, SortDir, SortFields, SortValue};

#[derive(Clone, Debug, PartialEq)]
struct Entry {
    id: i64,
    group: &'static str,
    score: i64,
    active: bool,
}

fn collection() -> Vec<Entry> {
    (1..=23)
        .map(|id| Entry {
            id,
            group: if id % 3 == 0 { "fizz" } else { "plain" },
            score: id % 4,
            active: id % 5 != 0,
        })
        .collect()
}

fn fields() -> SortFields<Entry> {
    SortFields::new()
        .field("id", |e: &Entry| SortValue::Int(e.id))
        .field("score", |e| SortValue::Int(e.score))
        .field("group", |e| SortValue::text(e.group))
}

fn filter() -> Filter<Entry> {
    Filter::new()
        .text_eq(Some("plain"), |e: &Entry| Some(e.group))
        .active_only(true, |e| e.active)
}

#[test]
fn pages_partition_the_sorted_result() {
    let key = fields().resolve("score", SortDir::Desc).unwrap();
    let whole = execute(
        collection(),
        &filter(),
        Some(&key),
        PageRequest::new(0, 1000).unwrap(),
    );

    let first = execute(collection(), &filter(), Some(&key), PageRequest::new(0, 4).unwrap());
    let mut stitched = Vec::new();
    for page in 0..first.total_pages {
        let p = execute(
            collection(),
            &filter(),
            Some(&key),
            PageRequest::new(page as i64, 4).unwrap(),
        );
        assert!(p.content.len() <= 4);
        assert_eq!(p.total_elements, whole.total_elements);
        stitched.extend(p.content);
    }
    assert_eq!(stitched, whole.content);
}

#[test]
fn no_false_positives() {
    let page = execute(collection(), &filter(), None, PageRequest::new(0, 100).unwrap());
    assert!(!page.content.is_empty());
    assert!(page.content.iter().all(|e| e.group == "plain" && e.active));
}

#[test]
fn repeated_queries_are_identical() {
    let key = fields().resolve("group", SortDir::Asc).unwrap();
    let a = execute(collection(), &filter(), Some(&key), PageRequest::new(1, 3).unwrap());
    let b = execute(collection(), &filter(), Some(&key), PageRequest::new(1, 3).unwrap());
    assert_eq!(a, b);
}

#[test]
fn ties_keep_insertion_order_in_both_directions() {
    for dir in [SortDir::Asc, SortDir::Desc] {
        let key = fields().resolve("score", dir).unwrap();
        let page = execute(
            collection(),
            &Filter::new(),
            Some(&key),
            PageRequest::new(0, 100).unwrap(),
        );
        for pair in page.content.windows(2) {
            if pair[0].score == pair[1].score {
                assert!(pair[0].id < pair[1].id, "tie reordered: {:?}", pair);
            }
        }
    }
}
