//! Integration tests for the snippet store.
//!
//! These tests exercise the public store API end to end: saving with
//! dependency detection, the three deletion policies, query composition and
//! the listing formatter.

use rstest::{fixture, rstest};
use sqlsnip::domain::DeleteMode;
use sqlsnip::error::Error;
use sqlsnip::format::{NO_STORED_SNIPPETS, describe_stored};
use sqlsnip::store::SnippetStore;

// ============================================================================
// Fixtures
// ============================================================================

/// `high_price` with two direct dependents, `high_price_a` and `high_price_b`
#[fixture]
fn store() -> SnippetStore {
    let mut store = SnippetStore::new();
    store
        .save("high_price", "SELECT *\nFROM \"test_store\"\nWHERE price >= 1.50")
        .unwrap();
    store
        .save("high_price_a", "SELECT *\nFROM \"high_price\"\nWHERE symbol == 'a'")
        .unwrap();
    store
        .save("high_price_b", "SELECT *\nFROM \"high_price\"\nWHERE symbol == 'b'")
        .unwrap();
    store
}

/// [`store`] plus `high_price_b_child` reading from `high_price_b`
#[fixture]
fn store_with_child(mut store: SnippetStore) -> SnippetStore {
    store
        .save(
            "high_price_b_child",
            "SELECT *\nFROM \"high_price_b\"\nWHERE symbol == 'b'\nLIMIT 3",
        )
        .unwrap();
    store
}

fn names(store: &SnippetStore) -> Vec<&str> {
    store.names()
}

// ========== Save and Lookup ==========

#[rstest]
fn test_direct_dependents(store: SnippetStore) {
    assert_eq!(
        store.direct_dependents_of("high_price").unwrap(),
        ["high_price_a", "high_price_b"]
    );
    assert!(store.direct_dependents_of("high_price_a").unwrap().is_empty());
}

#[rstest]
fn test_all_in_insertion_order(store: SnippetStore) {
    assert_eq!(names(&store), ["high_price", "high_price_a", "high_price_b"]);

    let first = store.all();
    let second = store.all();
    assert_eq!(first, second);
}

#[rstest]
fn test_duplicate_save_keeps_original(mut store: SnippetStore) {
    let err = store.save("high_price", "SELECT 1").unwrap_err();

    assert!(matches!(err, Error::DuplicateName(ref name) if name == "high_price"));
    assert!(store.get("high_price").unwrap().query_text.contains("test_store"));
}

#[rstest]
fn test_transitive_dependents_deepest_first(store_with_child: SnippetStore) {
    assert_eq!(
        store_with_child.transitive_dependents_of("high_price").unwrap(),
        ["high_price_a", "high_price_b_child", "high_price_b"]
    );
    assert!(
        store_with_child
            .transitive_dependents_of("high_price_b_child")
            .unwrap()
            .is_empty()
    );
}

// ========== Deletion ==========

#[rstest]
fn test_safe_delete_refused_with_dependents(mut store: SnippetStore) {
    let err = store.safe_delete("high_price").unwrap_err();

    match err {
        Error::DependentsExist {
            name,
            dependents,
            cascade,
        } => {
            assert_eq!(name, "high_price");
            assert_eq!(dependents, ["high_price_a", "high_price_b"]);
            assert_eq!(cascade, ["high_price_a", "high_price_b", "high_price"]);
        }
        other => panic!("expected DependentsExist, got {other:?}"),
    }
    assert!(store.contains("high_price"));
    assert_eq!(store.len(), 3);
}

#[rstest]
fn test_safe_delete_leaf(mut store: SnippetStore) {
    let deletion = store.safe_delete("high_price_a").unwrap();

    assert_eq!(deletion.removed, ["high_price_a"]);
    assert_eq!(names(&store), ["high_price", "high_price_b"]);
}

#[rstest]
fn test_force_delete_leaves_dependents(mut store: SnippetStore) {
    let deletion = store.force_delete("high_price").unwrap();

    assert_eq!(deletion.removed, ["high_price"]);
    assert_eq!(deletion.dangling_dependents, ["high_price_a", "high_price_b"]);
    assert_eq!(names(&store), ["high_price_a", "high_price_b"]);
    assert_eq!(
        store.get("high_price_a").unwrap().direct_dependencies,
        ["high_price"]
    );
}

#[rstest]
fn test_force_delete_all_child(mut store_with_child: SnippetStore) {
    let deletion = store_with_child.force_delete_all("high_price_b").unwrap();

    assert_eq!(deletion.removed, ["high_price_b_child", "high_price_b"]);
    assert_eq!(names(&store_with_child), ["high_price", "high_price_a"]);
}

#[rstest]
fn test_force_delete_all_root_empties_store(mut store_with_child: SnippetStore) {
    let deletion = store_with_child.force_delete_all("high_price").unwrap();

    assert_eq!(
        deletion.removed,
        [
            "high_price_a",
            "high_price_b_child",
            "high_price_b",
            "high_price"
        ]
    );
    assert!(store_with_child.is_empty());
    assert_eq!(describe_stored(&store_with_child.names()), NO_STORED_SNIPPETS);
}

#[rstest]
#[case(DeleteMode::Safe)]
#[case(DeleteMode::Force)]
#[case(DeleteMode::Cascade)]
fn test_delete_missing_name(mut store: SnippetStore, #[case] mode: DeleteMode) {
    let err = store.delete("nonexistent", mode).unwrap_err();

    assert!(matches!(err, Error::SnippetNotFound(ref name) if name == "nonexistent"));
    assert_eq!(store.len(), 3);
}

#[test]
fn test_delete_missing_name_on_empty_store() {
    let mut store = SnippetStore::new();
    assert!(matches!(
        store.safe_delete("nonexistent"),
        Err(Error::SnippetNotFound(_))
    ));
}

#[test]
fn test_cascade_diamond_has_no_duplicates() {
    let mut store = SnippetStore::new();
    store.save("base", "SELECT 1").unwrap();
    store.save("lhs", "SELECT * FROM base").unwrap();
    store.save("rhs", "SELECT * FROM base").unwrap();
    store
        .save("top", "SELECT * FROM lhs JOIN rhs ON lhs.id = rhs.id")
        .unwrap();

    let deletion = store.force_delete_all("base").unwrap();

    assert_eq!(deletion.removed.len(), 4);
    assert_eq!(deletion.removed.last().map(String::as_str), Some("base"));
    let position = |name: &str| deletion.removed.iter().position(|n| n == name).unwrap();
    assert!(position("top") < position("lhs"));
    assert!(position("top") < position("rhs"));
    assert!(store.is_empty());
}

// ========== Rendering ==========

#[rstest]
fn test_render_inlines_dependencies(store_with_child: SnippetStore) {
    let rendered = store_with_child.render("high_price_b_child").unwrap();

    assert_eq!(
        rendered,
        "WITH high_price AS (SELECT *\nFROM \"test_store\"\nWHERE price >= 1.50), \
         high_price_b AS (SELECT *\nFROM \"high_price\"\nWHERE symbol == 'b')\n\
         SELECT *\nFROM \"high_price_b\"\nWHERE symbol == 'b'\nLIMIT 3"
    );
}

#[rstest]
fn test_render_after_force_delete_reports_dangling(mut store: SnippetStore) {
    store.force_delete("high_price").unwrap();

    let err = store.render("high_price_a").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Snippet 'high_price_a' references 'high_price', which is no longer saved"
    );
}

#[rstest]
fn test_resaving_force_deleted_name_reattaches_dependents(mut store: SnippetStore) {
    store.force_delete("high_price").unwrap();
    store.save("high_price", "SELECT * FROM stock").unwrap();

    assert_eq!(
        store.direct_dependents_of("high_price").unwrap(),
        ["high_price_a", "high_price_b"]
    );
    assert!(store.render("high_price_a").is_ok());
}
