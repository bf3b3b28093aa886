pub mod catalog;
pub mod data_type;
pub mod errors;
pub mod es_index;
pub mod filtered_catalog;
pub mod index_resolver;
pub mod type_mapping;


// Re-export commonly used types
pub use catalog::{Catalog, PreloadedCatalog};
pub use data_type::DataType;
pub use errors::MappingError;
pub use es_index::{EsIndex, GetIndexResult};
pub use filtered_catalog::{CatalogFilter, FilteredCatalog};
pub use index_resolver::IndexResolver;
pub use type_mapping::{Columns, DefaultTypeMapper, TypeMapper};
