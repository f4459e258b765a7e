//! Core module - Data model and filtering primitives
//!
//! This module provides:
//! - The export data model (FileRecord, DirStats, Collection)
//! - The rule engine for exclusion/ignore/sensitive classification
//! - Path normalization utilities
//! - Token counting for LLM context budgeting
//! - The export error taxonomy

pub mod error;
pub mod model;
pub mod paths;
pub mod rules;
pub mod tokenizer;
