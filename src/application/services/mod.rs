pub mod apply_handoff;
pub mod reconciler;
