// Skill normalization and grouping engine.
// Implements: cleaning, discard filtering, normalization, similarity, first-fit grouping,
// taxonomy consolidation and the per-record relevance rollup.
// The engine is synchronous and CPU-bound; handlers run it inside spawn_blocking.

pub mod cleaner;
pub mod discard;
pub mod engine;
pub mod extract;
pub mod handlers;
pub mod normalizer;
pub mod rollup;
pub mod similarity;
pub mod summary;
