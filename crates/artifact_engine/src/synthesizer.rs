//! Artifact synthesis for a project root.
//!
//! The synthesizer turns resolved configuration records into the full set of
//! deployment artifacts and applies them in a fixed order:
//!
//! 1. `Makefile` marked block
//! 2. `Dockerfile`
//! 3. one compose descriptor per known environment
//! 4. `.deploy.env.common`, then one `.deploy.env.<env>` per known environment
//! 5. `AGENTS.md` / `CLAUDE.md` tip blocks, only when those files exist
//!
//! Each artifact's content is computed fully in memory before its single
//! write, so an unforced rerun with the same inputs reports every artifact as
//! `unchanged` or `skipped`.

use crate::render::ArtifactRenderer;
use crate::writer::{write_artifact, ArtifactOutcome, WriteStrategy};
use crate::{Error, Result};
use deploy_config::{
    collect_custom_envs, env_file, known_environments, shared_env_file_name, ConfigKey,
    ConfigResolver, EnvironmentName, Overrides, Profile, ResolvedConfig,
};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, instrument};

#[cfg(test)]
#[path = "synthesizer_tests.rs"]
mod tests;

pub const MAKEFILE: &str = "Makefile";
pub const MAKEFILE_START: &str = "# DEPLOYMENT-CONFIG:START";
pub const MAKEFILE_END: &str = "# DEPLOYMENT-CONFIG:END";
pub const DOCKERFILE: &str = "Dockerfile";
pub const DEPLOYMENT_TIPS_START: &str = "<!-- DEPLOYMENT:START -->";
pub const DEPLOYMENT_TIPS_END: &str = "<!-- DEPLOYMENT:END -->";

/// Documentation files that receive the tips block when present.
pub const TIPS_FILES: [&str; 2] = ["AGENTS.md", "CLAUDE.md"];

/// Overwrite switches for generator-owned files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForceOptions {
    pub compose: bool,
    pub env_files: bool,
    pub dockerfile: bool,
}

/// Everything needed to synthesize a project's artifacts.
#[derive(Debug, Clone)]
pub struct SynthesisPlan {
    /// Record of the requested environment; supplies global defaults and the
    /// shared variable file.
    pub base: ResolvedConfig,
    /// Records of every known environment, standard ones first.
    pub environments: Vec<ResolvedConfig>,
    /// Custom environment names in discovery order.
    pub custom_envs: Vec<EnvironmentName>,
    pub force: ForceOptions,
}

impl SynthesisPlan {
    /// Resolves every known environment for `requested`.
    ///
    /// Custom environments are discovered from the overrides, the profile and
    /// the requested name itself.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the first environment that fails to
    /// resolve.
    pub fn resolve(
        profile: &Profile,
        requested: &EnvironmentName,
        overrides: &Overrides,
        force: ForceOptions,
    ) -> Result<Self> {
        let resolver = ConfigResolver::new();
        let custom_envs = collect_custom_envs(overrides.custom_envs(), profile, Some(requested));
        let known = known_environments(&custom_envs);

        let environments = resolver.resolve_all(profile, &known, overrides)?;
        let base = resolver
            .resolve(profile, requested, overrides)
            .map_err(|e| e.in_environment(requested.as_str()))?;

        debug!(
            requested = %requested,
            environments = environments.len(),
            custom = custom_envs.len(),
            "Planned synthesis"
        );

        Ok(Self {
            base,
            environments,
            custom_envs,
            force,
        })
    }

    fn environment(&self, env: &EnvironmentName) -> &ResolvedConfig {
        self.environments
            .iter()
            .find(|config| config.env() == env)
            .unwrap_or(&self.base)
    }
}

/// Outcome of one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactResult {
    /// Path relative to the project root.
    pub path: String,
    pub outcome: ArtifactOutcome,
}

/// Outcomes of a synthesis run, in application order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesisReport {
    pub root: String,
    pub custom_envs: Vec<String>,
    pub artifacts: Vec<ArtifactResult>,
}

impl SynthesisReport {
    /// Outcome recorded for `path`, if the artifact was planned.
    pub fn outcome(&self, path: &str) -> Option<ArtifactOutcome> {
        self.artifacts
            .iter()
            .find(|result| result.path == path)
            .map(|result| result.outcome)
    }
}

/// One planned write.
struct PlannedArtifact {
    path: String,
    /// What the artifact is, for conflict reports.
    label: String,
    strategy: WriteStrategy,
    content: String,
}

/// Plans and applies deployment artifacts.
pub struct ArtifactSynthesizer {
    renderer: ArtifactRenderer,
}

impl ArtifactSynthesizer {
    /// # Errors
    ///
    /// Returns `Error::Render` if an embedded template fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            renderer: ArtifactRenderer::new()?,
        })
    }

    /// Writes every artifact of `plan` under `root`.
    ///
    /// # Errors
    ///
    /// - `Error::RootNotFound` if `root` is not an existing directory
    /// - `Error::Render` if a template fails to render
    /// - `Error::PathConflict` if two artifacts would write the same file;
    ///   nothing is written in that case
    /// - `Error::Io` naming the artifact that could not be read or written
    #[instrument(skip_all, fields(root = %root.display(), env = %plan.base.env()))]
    pub fn synthesize(&self, root: &Path, plan: &SynthesisPlan) -> Result<SynthesisReport> {
        if !root.is_dir() {
            return Err(Error::RootNotFound {
                path: root.display().to_string(),
            });
        }

        let planned = self.plan(root, plan)?;
        let mut artifacts = Vec::with_capacity(planned.len());

        for artifact in planned {
            let path = root.join(&artifact.path);
            let outcome = write_artifact(&path, &artifact.strategy, &artifact.content)?;
            artifacts.push(ArtifactResult {
                path: artifact.path,
                outcome,
            });
        }

        let changed = artifacts
            .iter()
            .filter(|a| matches!(a.outcome, ArtifactOutcome::Created | ArtifactOutcome::Updated))
            .count();
        info!(artifacts = artifacts.len(), changed, "Synthesized deployment artifacts");

        Ok(SynthesisReport {
            root: root.display().to_string(),
            custom_envs: plan.custom_envs.iter().map(|e| e.to_string()).collect(),
            artifacts,
        })
    }

    fn plan(&self, root: &Path, plan: &SynthesisPlan) -> Result<Vec<PlannedArtifact>> {
        let mut planned = Vec::new();

        let makefile = self.renderer.makefile_block(
            &plan.base,
            plan.environment(&EnvironmentName::local()),
            plan.environment(&EnvironmentName::test()),
            plan.environment(&EnvironmentName::prod()),
            &plan.custom_envs,
        )?;
        planned.push(PlannedArtifact {
            path: MAKEFILE.to_string(),
            label: "entrypoint".to_string(),
            strategy: WriteStrategy::MarkedBlock {
                start: MAKEFILE_START,
                end: MAKEFILE_END,
            },
            content: makefile,
        });

        planned.push(PlannedArtifact {
            path: DOCKERFILE.to_string(),
            label: "container build file".to_string(),
            strategy: WriteStrategy::WholeFile {
                force: plan.force.dockerfile,
            },
            content: self.renderer.dockerfile(&plan.base)?,
        });

        for config in &plan.environments {
            planned.push(PlannedArtifact {
                path: config.compose_file().to_string(),
                label: format!("{} descriptor", config.env()),
                strategy: WriteStrategy::WholeFile {
                    force: plan.force.compose,
                },
                content: self.renderer.compose(config)?,
            });
        }

        let env_strategy = WriteStrategy::WholeFile {
            force: plan.force.env_files,
        };
        planned.push(PlannedArtifact {
            path: shared_env_file_name(),
            label: "shared variable file".to_string(),
            strategy: env_strategy.clone(),
            content: shared_env_file(&plan.base),
        });
        for config in &plan.environments {
            planned.push(PlannedArtifact {
                path: config.env().env_file_name(),
                label: format!("{} variable file", config.env()),
                strategy: env_strategy.clone(),
                content: environment_env_file(config, &plan.base),
            });
        }

        let tips = self.renderer.deployment_tips()?;
        for name in TIPS_FILES {
            if root.join(name).is_file() {
                planned.push(PlannedArtifact {
                    path: name.to_string(),
                    label: "deployment tips".to_string(),
                    strategy: WriteStrategy::MarkedBlock {
                        start: DEPLOYMENT_TIPS_START,
                        end: DEPLOYMENT_TIPS_END,
                    },
                    content: tips.clone(),
                });
            } else {
                debug!(file = name, "Tips file absent; not creating it");
            }
        }

        check_unique_paths(&planned)?;
        Ok(planned)
    }
}

fn check_unique_paths(planned: &[PlannedArtifact]) -> Result<()> {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    for artifact in planned {
        if let Some(first) = owners.insert(&artifact.path, &artifact.label) {
            return Err(Error::PathConflict {
                path: artifact.path.clone(),
                first: first.to_string(),
                second: artifact.label.clone(),
            });
        }
    }
    Ok(())
}

/// Contents of `.deploy.env.common`: the shared keys of the base record.
pub fn shared_env_file(base: &ResolvedConfig) -> String {
    env_file::render(
        Some("DEPLOYMENT-ENV:common"),
        &base.pairs(&ConfigKey::SHARED),
    )
}

/// Contents of `.deploy.env.<env>`.
///
/// Holds the environment's target keys plus any shared key whose value
/// differs from the base record, so the environment file alone restores the
/// environment's full configuration on top of the shared file.
pub fn environment_env_file(config: &ResolvedConfig, base: &ResolvedConfig) -> String {
    let mut pairs = config.pairs(&ConfigKey::TARGET);
    pairs.extend(
        ConfigKey::SHARED
            .iter()
            .filter(|key| config.get(**key) != base.get(**key))
            .map(|key| (key.canonical_name(), config.get(*key))),
    );
    let header = format!("DEPLOYMENT-ENV:{}", config.env());
    env_file::render(Some(&header), &pairs)
}

