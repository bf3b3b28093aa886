use std::sync::Arc;

use futures_util::future::join_all;
use sql_index_catalog::index_catalog::{DataType, GetIndexResult};
use sql_index_catalog::metadata::{Feature, GetIndexResponse, IndicesOptions};
use sql_index_catalog::{EsIndex, IndexResolver};

use super::common::{filtered_resolver, hide, resolver, MockMetadataClient, TransportError};

#[tokio::test]
async fn test_concrete_index_resolves_to_valid_table() {
    let catalog = resolver().resolve_one("emp").await.unwrap();

    let result = catalog.lookup("emp");
    let index = result.index().expect("emp is a valid table");
    assert_eq!(index.name(), "emp");
    assert_eq!(index.column("emp_no"), Some(&DataType::Integer));
    assert_eq!(index.column("salary"), Some(&DataType::Long));
    assert!(matches!(index.column("address"), Some(DataType::Object(props)) if props.len() == 2));
}

#[tokio::test]
async fn test_alias_to_single_index_keeps_alias_name() {
    let catalog = resolver().resolve_one("myalias").await.unwrap();

    assert_eq!(
        catalog.lookup("myalias").index().map(EsIndex::name),
        Some("myalias")
    );
    // the concrete name never leaks into the catalog
    assert_eq!(
        catalog.lookup("concrete_1"),
        GetIndexResult::not_found("concrete_1")
    );
    let listed: Vec<String> = catalog.list().iter().map(|i| i.name().to_string()).collect();
    assert_eq!(listed, vec!["myalias"]);
}

#[tokio::test]
async fn test_alias_over_several_indices_is_invalid() {
    let catalog = resolver().resolve_one("logs").await.unwrap();

    assert_eq!(
        catalog.lookup("logs"),
        GetIndexResult::invalid(
            "[logs] is an alias pointing to more than one index which is currently incompatible with sql"
        )
    );
    assert!(catalog.list().is_empty());
}

#[tokio::test]
async fn test_internal_index_is_hidden() {
    let resolver = resolver();

    for name in [".security", "security"] {
        let catalog = resolver.resolve_one(name).await.unwrap();
        assert_eq!(catalog.lookup(name), GetIndexResult::not_found(name));
        assert!(catalog.list().is_empty());
    }
}

#[tokio::test]
async fn test_unknown_name_is_absent() {
    let catalog = resolver().resolve_one("does_not_exist").await.unwrap();
    assert_eq!(
        catalog.lookup("does_not_exist"),
        GetIndexResult::not_found("does_not_exist")
    );
    assert!(catalog.list().is_empty());
}

#[tokio::test]
async fn test_default_type_does_not_contribute_columns() {
    let catalog = resolver().resolve_one("with_default").await.unwrap();

    let result = catalog.lookup("with_default");
    let index = result.index().unwrap();
    assert_eq!(index.columns().len(), 1);
    assert_eq!(index.column("title"), Some(&DataType::Text));
}

#[tokio::test]
async fn test_incompatible_mappings_are_invalid() {
    let resolver = resolver();

    let catalog = resolver.resolve_one("multi_type").await.unwrap();
    assert_eq!(
        catalog.lookup("multi_type").invalid_reason(),
        Some("[multi_type] contains more than one type: [doc1, doc2] so it is incompatible with sql")
    );

    let catalog = resolver.resolve_one("untyped").await.unwrap();
    assert_eq!(
        catalog.lookup("untyped").invalid_reason(),
        Some("[untyped] doesn't have any types so it is incompatible with sql")
    );

    let catalog = resolver.resolve_one("geo").await.unwrap();
    assert!(catalog
        .lookup("geo")
        .invalid_reason()
        .unwrap()
        .contains("unsupported type `geo_point`"));
}

#[tokio::test]
async fn test_filter_downgrades_lookup() {
    let resolver = filtered_resolver(hide("emp"));
    let catalog = resolver.resolve_one("emp").await.unwrap();

    assert_eq!(catalog.lookup("emp"), GetIndexResult::not_found("emp"));
    assert!(catalog.list().is_empty());
}

#[tokio::test]
async fn test_filter_cannot_upgrade_invalid_result() {
    let resolver = filtered_resolver(Arc::new(|_: GetIndexResult| {
        GetIndexResult::valid(EsIndex::new("forged", Default::default()))
    }));

    let catalog = resolver.resolve_one("multi_type").await.unwrap();
    assert!(!catalog.lookup("multi_type").is_valid());

    let catalog = resolver.resolve_one(".security").await.unwrap();
    assert_eq!(
        catalog.lookup(".security"),
        GetIndexResult::not_found(".security")
    );
}

#[tokio::test]
async fn test_filter_passes_unmatched_results_through() {
    let filtered = filtered_resolver(hide("nothing-matches"));
    let plain = resolver();

    for name in ["emp", "myalias", "logs", "multi_type", ".security", "missing"] {
        let with_filter = filtered.resolve_one(name).await.unwrap().lookup(name);
        let without_filter = plain.resolve_one(name).await.unwrap().lookup(name);
        assert_eq!(with_filter, without_filter, "mismatch for {}", name);
    }
}

#[tokio::test]
async fn test_resolution_is_idempotent() {
    let resolver = resolver();

    for name in ["emp", "myalias", "logs", "multi_type"] {
        let first = resolver.resolve_one(name).await.unwrap().lookup(name);
        let second = resolver.resolve_one(name).await.unwrap().lookup(name);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[tokio::test]
async fn test_concurrent_resolutions_are_independent() {
    let resolver = resolver();
    let names = ["emp", "myalias", "logs", ".security", "missing", "with_default"];

    let catalogs = join_all(names.iter().map(|name| resolver.resolve_one(name))).await;

    for (name, catalog) in names.iter().zip(catalogs) {
        let concurrent = catalog.unwrap().lookup(name);
        let sequential = resolver.resolve_one(name).await.unwrap().lookup(name);
        assert_eq!(concurrent, sequential);
    }
}

#[tokio::test]
async fn test_metadata_failure_is_propagated_unchanged() {
    let mut client = MockMetadataClient::new();
    client
        .expect_get_index()
        .times(1)
        .returning(|_| Err(TransportError::NodeDisconnected("node-1".to_string())));

    let resolver = IndexResolver::new(client, None);
    let err = resolver.resolve_one("emp").await.err().expect("resolution fails");
    assert_eq!(err, TransportError::NodeDisconnected("node-1".to_string()));
}

#[tokio::test]
async fn test_issues_local_lenient_mapping_request() {
    let mut client = MockMetadataClient::new();
    client
        .expect_get_index()
        .withf(|request| {
            request.indices == vec!["emp".to_string()]
                && request.local
                && request.features == vec![Feature::Mappings]
                && request.indices_options == IndicesOptions::lenient_expand_open()
        })
        .times(1)
        .returning(|_| Ok(GetIndexResponse::default()));

    let resolver = IndexResolver::new(client, None);
    let catalog = resolver.resolve_one("emp").await.unwrap();
    assert!(catalog.list().is_empty());
}
