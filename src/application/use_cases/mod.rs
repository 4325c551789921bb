pub mod apply_state;
pub mod bootstrap_source;
