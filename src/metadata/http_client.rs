//! REST client for the document store's `_mapping` endpoint
//!
//! Issues `GET {base_url}/{indices}/_mapping` with the request's expansion
//! options as query parameters. The store answers
//!
//! ```json
//! { "emp": { "mappings": { "doc": { "properties": { ... } } } } }
//! ```
//!
//! which [`parse_mapping_response`] turns into a [`GetIndexResponse`].

use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

use super::errors::MetadataError;
use super::{
    Feature, GetIndexRequest, GetIndexResponse, IndexMetadataClient, MappingMetadata,
    TypeMappings,
};
use crate::config::CatalogConfig;
use crate::utils::index_pattern;

/// Root-level mapping parameters; a body carrying any of them has no type wrapper
const MAPPING_PARAMETERS: &[&str] = &[
    "properties",
    "dynamic",
    "_source",
    "_meta",
    "_routing",
    "dynamic_templates",
    "date_detection",
    "numeric_detection",
];

/// Name reported for the single type of a typeless index
const TYPELESS_TYPE: &str = "_doc";

#[derive(Debug, Deserialize)]
struct IndexMappingsBody {
    #[serde(default)]
    mappings: Map<String, Value>,
}

/// [`IndexMetadataClient`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpIndexMetadataClient {
    client: Client,
    base_url: Url,
}

impl HttpIndexMetadataClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MetadataError> {
        let base_url = base_url.into();
        let parsed = Url::parse(&base_url).map_err(|e| MetadataError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(MetadataError::InvalidUrl {
                url: base_url,
                reason: "not a base URL".to_string(),
            });
        }

        let client = Client::builder().timeout(timeout).build()?;
        info!("Index metadata client targeting {}", parsed);
        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, MetadataError> {
        Self::new(config.metadata_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Full `_mapping` URL for `request`, path and query percent-encoded
    pub fn mapping_url(&self, request: &GetIndexRequest) -> Result<Url, MetadataError> {
        let indices = if request.indices.is_empty() {
            index_pattern::ALL.to_string()
        } else {
            request.indices.join(",")
        };

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MetadataError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "not a base URL".to_string(),
            })?
            .pop_if_empty()
            .push(&indices)
            .push("_mapping");

        let options = &request.indices_options;
        url.query_pairs_mut()
            .append_pair("local", &request.local.to_string())
            .append_pair("ignore_unavailable", &options.ignore_unavailable.to_string())
            .append_pair("allow_no_indices", &options.allow_no_indices.to_string())
            .append_pair("expand_wildcards", options.expand_wildcards());
        Ok(url)
    }
}

#[async_trait]
impl IndexMetadataClient for HttpIndexMetadataClient {
    type Error = MetadataError;

    async fn get_index(&self, request: GetIndexRequest) -> Result<GetIndexResponse, Self::Error> {
        if !request.wants(Feature::Mappings) {
            return Ok(GetIndexResponse::default());
        }

        let url = self.mapping_url(&request)?;
        debug!("Requesting index mappings: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let indices: BTreeMap<String, IndexMappingsBody> = response.json().await?;
        Ok(into_response(indices))
    }
}

/// Decode a `_mapping` response body
///
/// Two layouts are accepted per index: typed (`mappings.{type}.{...}`) and
/// typeless (`mappings.{properties, dynamic, ...}`), the latter reported as a
/// single `_doc` type.
pub fn parse_mapping_response(body: &str) -> Result<GetIndexResponse, MetadataError> {
    let indices: BTreeMap<String, IndexMappingsBody> = serde_json::from_str(body)?;
    Ok(into_response(indices))
}

fn into_response(indices: BTreeMap<String, IndexMappingsBody>) -> GetIndexResponse {
    let mut response = GetIndexResponse::default();
    for (index, body) in indices {
        let types: TypeMappings = if is_typeless(&body.mappings) {
            debug!("[{}] has a typeless mapping", index);
            TypeMappings::from([(
                TYPELESS_TYPE.to_string(),
                MappingMetadata::new(TYPELESS_TYPE, Value::Object(body.mappings)),
            )])
        } else {
            body.mappings
                .into_iter()
                .map(|(type_name, source)| {
                    let mapping = MappingMetadata::new(type_name.clone(), source);
                    (type_name, mapping)
                })
                .collect()
        };
        response.insert_index(index, types);
    }
    response
}

/// A typed body maps type names to type objects; anything else is the mapping itself
fn is_typeless(mappings: &Map<String, Value>) -> bool {
    mappings
        .keys()
        .any(|key| MAPPING_PARAMETERS.contains(&key.as_str()))
        || !mappings.values().all(Value::is_object)
}
