// Interview evaluation checklist.
// Skills are derived from an offer's requirements text on every load and never
// stored; only per-position check/comment state is persisted.

pub mod extractor;
pub mod flat;
pub mod handlers;
pub mod nested;
pub mod state;
pub mod store;
pub mod view;
