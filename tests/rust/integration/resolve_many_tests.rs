use std::collections::BTreeMap;

use serde_json::json;
use sql_index_catalog::index_catalog::GetIndexResult;
use sql_index_catalog::metadata::{GetIndexResponse, MappingMetadata, TypeMappings};
use sql_index_catalog::{EsIndex, IndexResolver};

use super::common::{filtered_resolver, hide, resolver, MockMetadataClient, TransportError};

fn names(indices: &[EsIndex]) -> Vec<&str> {
    indices.iter().map(EsIndex::name).collect()
}

fn single_type(source: serde_json::Value) -> TypeMappings {
    let mut types = TypeMappings::new();
    types.insert("doc".to_string(), MappingMetadata::new("doc", source));
    types
}

#[tokio::test]
async fn test_results_sorted_by_name() {
    let indices = resolver().resolve_many(&["c", "a", "b"]).await.unwrap();
    assert_eq!(names(&indices), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_wildcard_expands_to_concrete_names() {
    let indices = resolver().resolve_many(&["logs*"]).await.unwrap();
    // the closed logs-2022 is not expanded
    assert_eq!(names(&indices), vec!["logs-2023", "logs-2024"]);

    let indices = resolver().resolve_many(&["myalias"]).await.unwrap();
    assert_eq!(names(&indices), vec!["concrete_1"]);
}

#[tokio::test]
async fn test_match_all_keeps_only_valid_public_tables() {
    let indices = resolver().resolve_many(&["*"]).await.unwrap();

    assert_eq!(
        names(&indices),
        vec![
            "a",
            "b",
            "c",
            "concrete_1",
            "emp",
            "logs-2023",
            "logs-2024",
            "with_default"
        ]
    );
    assert!(!names(&indices).contains(&".security"));
}

#[tokio::test]
async fn test_overlapping_patterns_collapse() {
    let indices = resolver()
        .resolve_many(&["logs", "logs-*", "logs-2024", "*-2024"])
        .await
        .unwrap();
    assert_eq!(names(&indices), vec!["logs-2023", "logs-2024"]);
}

#[tokio::test]
async fn test_internal_index_never_listed() {
    let indices = resolver()
        .resolve_many(&[".security", "security", ".*"])
        .await
        .unwrap();
    assert!(indices.is_empty());
}

#[tokio::test]
async fn test_unmatched_patterns_yield_nothing() {
    let indices = resolver()
        .resolve_many(&["nope", "nothing-*", "remote:emp"])
        .await
        .unwrap();
    assert!(indices.is_empty());
}

#[tokio::test]
async fn test_filter_removes_downgraded_tables() {
    let indices = filtered_resolver(hide("logs"))
        .resolve_many(&["*"])
        .await
        .unwrap();

    assert!(names(&indices).iter().all(|name| !name.contains("logs")));
    assert!(names(&indices).contains(&"emp"));
}

#[tokio::test]
async fn test_filtered_output_is_a_subset_of_unfiltered() {
    let unfiltered = resolver().resolve_many(&["*"]).await.unwrap();
    let filtered = filtered_resolver(hide("c"))
        .resolve_many(&["*"])
        .await
        .unwrap();

    for index in &filtered {
        assert!(unfiltered.contains(index), "{} was not in the unfiltered output", index.name());
    }
    assert!(filtered.len() < unfiltered.len());
}

#[tokio::test]
async fn test_resolution_is_idempotent() {
    let resolver = resolver();
    let first = resolver.resolve_many(&["*", "emp"]).await.unwrap();
    let second = resolver.resolve_many(&["*", "emp"]).await.unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn test_single_request_for_all_patterns() {
    let mut client = MockMetadataClient::new();
    client
        .expect_get_index()
        .withf(|request| request.indices == vec!["b*".to_string(), "a*".to_string()])
        .times(1)
        .returning(|_| {
            let mut mappings = BTreeMap::new();
            mappings.insert("b1".to_string(), single_type(json!({})));
            mappings.insert(
                "a1".to_string(),
                single_type(json!({ "properties": { "n": { "type": "long" } } })),
            );
            mappings.insert(".a-internal".to_string(), single_type(json!({})));
            Ok(GetIndexResponse::new(mappings))
        });

    let resolver = IndexResolver::new(client, None);
    let indices = resolver.resolve_many(&["b*", "a*"]).await.unwrap();
    assert_eq!(names(&indices), vec!["a1", "b1"]);
}

#[tokio::test]
async fn test_metadata_failure_is_propagated_unchanged() {
    let mut client = MockMetadataClient::new();
    client
        .expect_get_index()
        .times(1)
        .returning(|_| Err(TransportError::NodeDisconnected("node-2".to_string())));

    let resolver = IndexResolver::new(client, Some(hide("x")));
    let err = resolver.resolve_many(&["*"]).await.unwrap_err();
    assert_eq!(err, TransportError::NodeDisconnected("node-2".to_string()));
}

#[tokio::test]
async fn test_names_match_lookup_results() {
    // every table listed by resolve_many is valid when resolved on its own
    let resolver = resolver();
    for index in resolver.resolve_many(&["*"]).await.unwrap() {
        let catalog = resolver.resolve_one(index.name()).await.unwrap();
        assert_eq!(catalog.lookup(index.name()), GetIndexResult::valid(index.clone()));
    }
}
