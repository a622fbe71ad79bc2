//! Filesystem rule-set loader.
//!
//! Rule sets live in YAML files (`*.yml` / `*.yaml`), one set per file,
//! named by the file stem. A directory scan reports per-file outcomes and
//! never aborts on a single bad file.

mod core;


pub use self::core::{load_rule_set, LoadResult, LoadStatus, RuleSetLoader};
