//! Merged variable view of one environment.
//!
//! Mirrors what `make ENV_MODE=<env>` sees: the `?=` defaults of the
//! generated Makefile block (global lines plus the branch selected for the
//! environment), overlaid with `.deploy.env.common` and then
//! `.deploy.env.<env>`. Later sources win.

use crate::{Error, Result};
use artifact_engine::{MAKEFILE, MAKEFILE_END, MAKEFILE_START};
use artifact_engine::marked_block::find_region;
use deploy_config::{env_file, shared_env_file_name, EnvVars, EnvironmentName};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

#[cfg(test)]
#[path = "merged_vars_tests.rs"]
mod tests;

const ENV_MODE_REF: &str = "$(ENV_MODE)";

/// One open conditional of the Makefile being scanned.
#[derive(Debug, Clone, Copy)]
struct Frame {
    /// Whether the enclosing scope is active.
    parent_active: bool,
    /// Whether the current branch applies.
    active: bool,
    /// Whether any branch of this conditional has applied.
    taken: bool,
}

/// Parses the `?=` defaults that apply to `env` from Makefile text.
///
/// Only the generated block is read when both sentinels exist; otherwise the
/// whole file is scanned. `$(ENV_MODE)` in values is replaced by the
/// environment name. As in `make`, the first `?=` assignment of a key wins.
pub fn entrypoint_defaults(makefile: &str, env: &EnvironmentName) -> EnvVars {
    let text = match find_region(makefile, MAKEFILE_START, MAKEFILE_END) {
        Some(region) => &makefile[region],
        None => makefile,
    };

    let mut vars = EnvVars::new();
    let mut frames: Vec<Frame> = Vec::new();
    let active = |frames: &[Frame]| frames.last().map_or(true, |f| f.active);

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line == "else" || line.starts_with("else ") {
            let rest = line["else".len()..].trim();
            if let Some(frame) = frames.last_mut() {
                if rest.is_empty() {
                    frame.active = frame.parent_active && !frame.taken;
                    frame.taken = true;
                } else if let Some(name) = env_mode_condition(rest) {
                    let matched = !frame.taken && name == env.as_str();
                    frame.active = frame.parent_active && matched;
                    frame.taken |= matched;
                } else {
                    frame.active = false;
                }
            }
            continue;
        }

        if line == "endif" {
            frames.pop();
            continue;
        }

        if is_conditional(line) {
            let parent_active = active(&frames);
            let frame = match env_mode_condition(line) {
                Some(name) => {
                    let matched = name == env.as_str();
                    Frame {
                        parent_active,
                        active: parent_active && matched,
                        taken: matched,
                    }
                }
                // Other conditions are not evaluated; their bodies are ignored.
                None => Frame {
                    parent_active,
                    active: false,
                    taken: true,
                },
            };
            frames.push(frame);
            continue;
        }

        if !active(&frames) {
            continue;
        }

        if let Some((key, value)) = line.split_once("?=") {
            let key = key.trim();
            if !key.is_empty() && !vars.contains_key(key) {
                vars.insert(key, value.trim().replace(ENV_MODE_REF, env.as_str()));
            }
        }
    }

    debug!(env = %env, keys = vars.len(), "Parsed entrypoint defaults");
    vars
}

fn is_conditional(line: &str) -> bool {
    ["ifeq", "ifneq", "ifdef", "ifndef"]
        .iter()
        .any(|kw| line.starts_with(kw) && line[kw.len()..].starts_with([' ', '(']))
}

/// Returns `X` for `ifeq ($(ENV_MODE),X)`.
fn env_mode_condition(line: &str) -> Option<&str> {
    let args = line.strip_prefix("ifeq")?.trim();
    let inner = args.strip_prefix('(')?.strip_suffix(')')?;
    let (left, right) = inner.split_once(',')?;
    if left.trim() == ENV_MODE_REF {
        Some(right.trim())
    } else {
        None
    }
}

/// Merged variables of one environment together with which sources existed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedVars {
    pub vars: EnvVars,
    pub makefile_found: bool,
    pub common_file_found: bool,
    pub env_file_found: bool,
}

impl MergedVars {
    /// Loads and merges the variable sources of `env` under `root`.
    ///
    /// Missing sources contribute nothing.
    pub fn load(root: &Path, env: &EnvironmentName) -> Result<Self> {
        let makefile_path = root.join(MAKEFILE);
        let makefile = read_optional(&makefile_path)?;

        let mut vars = makefile
            .as_deref()
            .map(|text| entrypoint_defaults(text, env))
            .unwrap_or_default();

        let common = env_file::read(&root.join(shared_env_file_name()))?;
        if let Some(common) = &common {
            vars.merge_from(common);
        }

        let own = env_file::read(&root.join(env.env_file_name()))?;
        if let Some(own) = &own {
            vars.merge_from(own);
        }

        vars.insert("ENV_MODE", env.as_str());

        Ok(Self {
            vars,
            makefile_found: makefile.is_some(),
            common_file_found: common.is_some(),
            env_file_found: own.is_some(),
        })
    }
}

/// Reads a text file, returning `None` when it does not exist.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}
