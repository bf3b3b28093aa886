pub mod index_pattern;
