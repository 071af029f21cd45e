pub mod difficulty;
pub mod phrase_catalog;
