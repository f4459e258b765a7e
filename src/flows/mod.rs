//! Flows module - The export pipeline stages
//!
//! Provides:
//! - walk: candidate discovery with directory pruning
//! - collect: file reading and metric accumulation
//! - aggregate: cumulative per-directory rollups
//! - render: the final text bundle
//! - export: orchestration, safety/limit gates and exit status

pub mod aggregate;
pub mod collect;
pub mod export;
pub mod render;
pub mod walk;
