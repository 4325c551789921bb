pub mod config_store;
pub mod directory_preparer;
pub mod mutator;
