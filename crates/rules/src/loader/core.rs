//! Core [`RuleSetLoader`] struct: directory-backed rule-set loading.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::RuleSetError;
use crate::rule_set::RuleSet;

/// Outcome of loading a single rule-set file.
#[derive(Debug)]
pub struct LoadResult {
    /// Path to the file that was loaded.
    pub path: PathBuf,
    /// Status of the load attempt.
    pub status: LoadStatus,
}

/// Status of a single file load attempt.
#[derive(Debug)]
pub enum LoadStatus {
    /// Rule set was successfully loaded.
    Loaded { name: String, entries: usize },
    /// File was skipped (dotfile, non-YAML, etc.).
    Skipped { reason: String },
    /// Parse error occurred.
    Failed { error: String },
}

/// Parse a single YAML file into a [`RuleSet`].
pub fn load_rule_set(path: &Path) -> Result<RuleSet, RuleSetError> {
    let contents = fs::read_to_string(path).map_err(|source| RuleSetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    RuleSet::from_yaml_str(&contents)
}

/// Directory-backed collection of named rule sets.
///
/// Scans a directory (recursively) for `*.yml` / `*.yaml` files and keeps
/// each parsed [`RuleSet`] under its file stem.
#[derive(Debug)]
pub struct RuleSetLoader {
    /// Root directory containing rule-set YAML files.
    rules_dir: PathBuf,
    /// Loaded rule sets keyed by file stem.
    sets: HashMap<String, RuleSet>,
}

impl RuleSetLoader {
    pub fn new(rules_dir: PathBuf) -> Self {
        Self {
            rules_dir,
            sets: HashMap::new(),
        }
    }

    /// Recursively scan the rules directory and load all YAML files.
    ///
    /// Dotfiles (filenames starting with `.`) and non-YAML files are skipped.
    /// Parse errors are reported per-file but do not abort the scan.
    pub fn load_all(&mut self) -> Result<Vec<LoadResult>, RuleSetError> {
        let mut results = Vec::new();
        let root = self.rules_dir.clone();
        self.scan_dir_recursive(&root, &mut results)?;
        Ok(results)
    }

    fn scan_dir_recursive(
        &mut self,
        dir: &Path,
        results: &mut Vec<LoadResult>,
    ) -> Result<(), RuleSetError> {
        let entries = fs::read_dir(dir).map_err(|source| RuleSetError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| RuleSetError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();

            // Skip dotfiles/dotdirs
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    if path.is_file() {
                        results.push(LoadResult {
                            path,
                            status: LoadStatus::Skipped {
                                reason: "dotfile".to_string(),
                            },
                        });
                    }
                    continue;
                }
            }

            if path.is_dir() {
                self.scan_dir_recursive(&path, results)?;
                continue;
            }

            let is_yaml = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e == "yml" || e == "yaml")
                .unwrap_or(false);

            if !is_yaml {
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Skipped {
                        reason: "not a YAML file".to_string(),
                    },
                });
                continue;
            }

            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Skipped {
                        reason: "file name is not valid UTF-8".to_string(),
                    },
                });
                continue;
            };

            match load_rule_set(&path) {
                Ok(set) => {
                    let entries = set.len();
                    info!(name = %name, entries, path = %path.display(), "loaded rule set");
                    if self.sets.insert(name.clone(), set).is_some() {
                        warn!(name = %name, path = %path.display(), "rule set name loaded twice, keeping the later file");
                    }
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Loaded { name, entries },
                    });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load rule set file");
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Failed {
                            error: e.to_string(),
                        },
                    });
                }
            }
        }

        Ok(())
    }

    /// Look up a loaded rule set by name (file stem).
    pub fn get(&self, name: &str) -> Option<&RuleSet> {
        self.sets.get(name)
    }

    /// Loaded rule-set names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get the rules directory path.
    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }
}
