//! Compose descriptor token contract.
//!
//! The contract is a table of rules, each naming the environment classes it
//! applies to and a token predicate over the descriptor text. Checks are
//! textual: the descriptor is not parsed as YAML.

use crate::merged_vars::read_optional;
use crate::{Error, Result};
use deploy_config::{
    EnvVars, EnvironmentClass, EnvironmentName, Violation, ViolationKind, ViolationSet,
};
use glob::Pattern;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

#[cfg(test)]
#[path = "descriptor_contract_tests.rs"]
mod tests;

/// Environment classes a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliesTo {
    All,
    Local,
    NonLocal,
    Prod,
}

impl AppliesTo {
    pub fn matches(self, class: EnvironmentClass) -> bool {
        match self {
            AppliesTo::All => true,
            AppliesTo::Local => class == EnvironmentClass::Local,
            AppliesTo::NonLocal => class != EnvironmentClass::Local,
            AppliesTo::Prod => class == EnvironmentClass::Prod,
        }
    }
}

/// Condition a descriptor must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPredicate {
    Contains(&'static str),
    AnyOf(&'static [&'static str]),
}

impl TokenPredicate {
    pub fn is_satisfied_by(&self, content: &str) -> bool {
        match self {
            TokenPredicate::Contains(token) => content.contains(token),
            TokenPredicate::AnyOf(tokens) => tokens.iter().any(|t| content.contains(t)),
        }
    }

    fn describe(&self) -> String {
        match self {
            TokenPredicate::Contains(token) => format!("'{token}'"),
            TokenPredicate::AnyOf(tokens) => tokens
                .iter()
                .map(|t| format!("'{t}'"))
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRule {
    pub id: &'static str,
    pub applies_to: AppliesTo,
    pub predicate: TokenPredicate,
}

/// Rules every generated descriptor satisfies, in evaluation order.
pub const DESCRIPTOR_CONTRACT: &[TokenRule] = &[
    TokenRule {
        id: "image-or-build",
        applies_to: AppliesTo::Local,
        predicate: TokenPredicate::AnyOf(&["build:", "image:"]),
    },
    TokenRule {
        id: "image",
        applies_to: AppliesTo::NonLocal,
        predicate: TokenPredicate::Contains("image:"),
    },
    TokenRule {
        id: "restart-policy",
        applies_to: AppliesTo::All,
        predicate: TokenPredicate::Contains("restart:"),
    },
    TokenRule {
        id: "health-probe",
        applies_to: AppliesTo::All,
        predicate: TokenPredicate::Contains("healthcheck:"),
    },
    TokenRule {
        id: "log-driver",
        applies_to: AppliesTo::All,
        predicate: TokenPredicate::Contains("logging:"),
    },
    TokenRule {
        id: "networks",
        applies_to: AppliesTo::All,
        predicate: TokenPredicate::Contains("networks:"),
    },
    TokenRule {
        id: "external-network",
        applies_to: AppliesTo::All,
        predicate: TokenPredicate::Contains("external: true"),
    },
    TokenRule {
        id: "deploy-section",
        applies_to: AppliesTo::Prod,
        predicate: TokenPredicate::Contains("deploy:"),
    },
    TokenRule {
        id: "resources",
        applies_to: AppliesTo::Prod,
        predicate: TokenPredicate::Contains("resources:"),
    },
    TokenRule {
        id: "limits",
        applies_to: AppliesTo::Prod,
        predicate: TokenPredicate::Contains("limits:"),
    },
];

/// Evaluates the contract for one descriptor's text.
///
/// Returns one `MissingToken` violation per failed rule; `file` only names
/// the descriptor in messages.
pub fn check_descriptor(content: &str, class: EnvironmentClass, file: &str) -> ViolationSet {
    let mut findings = ViolationSet::new();
    for rule in DESCRIPTOR_CONTRACT
        .iter()
        .filter(|rule| rule.applies_to.matches(class))
    {
        if !rule.predicate.is_satisfied_by(content) {
            findings.add(Violation::new(
                ViolationKind::MissingToken,
                rule.id,
                format!(
                    "{file} is missing {} ({})",
                    rule.predicate.describe(),
                    rule.id
                ),
            ));
        }
    }
    findings
}

/// Descriptor file of `env`: the merged `LOCAL_COMPOSE_FILE`, else the
/// environment's default name.
pub fn descriptor_file(merged: &EnvVars, env: &EnvironmentName) -> String {
    merged
        .get_non_empty("LOCAL_COMPOSE_FILE")
        .map(str::to_string)
        .unwrap_or_else(|| env.default_compose_file())
}

/// One descriptor to lint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptorTarget {
    pub env: EnvironmentName,
    pub file: String,
}

impl DescriptorTarget {
    pub fn new(env: EnvironmentName, file: impl Into<String>) -> Self {
        Self {
            env,
            file: file.into(),
        }
    }
}

fn custom_descriptor_pattern() -> &'static Pattern {
    static PATTERN: OnceLock<Pattern> = OnceLock::new();
    PATTERN.get_or_init(|| Pattern::new("docker-compose.*.yaml").expect("static pattern"))
}

/// The standard descriptors followed by every custom
/// `docker-compose.<name>.yaml` under `root`, sorted by file name.
pub fn discover_descriptors(root: &Path) -> Result<Vec<DescriptorTarget>> {
    let mut targets: Vec<DescriptorTarget> = EnvironmentName::standard()
        .into_iter()
        .map(|env| {
            let file = env.default_compose_file();
            DescriptorTarget::new(env, file)
        })
        .collect();

    let entries = fs::read_dir(root).map_err(|e| Error::io(root, e))?;
    let mut custom = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(root, e))?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !custom_descriptor_pattern().matches(&file_name)
            || targets.iter().any(|t| t.file == file_name)
        {
            continue;
        }

        let name = &file_name["docker-compose.".len()..file_name.len() - ".yaml".len()];
        match EnvironmentName::parse(name) {
            Ok(env) if env.is_custom() => custom.push(DescriptorTarget::new(env, file_name)),
            Ok(_) => {}
            Err(e) => warn!(
                file = %file_name,
                error = %e,
                "Skipping descriptor with invalid environment name"
            ),
        }
    }
    custom.sort_by(|a, b| a.file.cmp(&b.file));
    targets.extend(custom);

    debug!(count = targets.len(), "Discovered descriptors");
    Ok(targets)
}

/// Result of linting one or more descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptorLintReport {
    pub files: Vec<String>,
    #[serde(flatten)]
    pub findings: ViolationSet,
}

impl DescriptorLintReport {
    pub fn is_ok(&self) -> bool {
        self.findings.is_ok()
    }
}

/// Lints each target under `root`. A missing descriptor is a
/// `MissingArtifact` violation; every file is checked.
pub fn lint_descriptors(root: &Path, targets: &[DescriptorTarget]) -> Result<DescriptorLintReport> {
    let mut findings = ViolationSet::new();
    let mut files = Vec::with_capacity(targets.len());

    for target in targets {
        files.push(target.file.clone());
        match read_optional(&root.join(&target.file))? {
            Some(content) => {
                findings.extend(check_descriptor(&content, target.env.class(), &target.file));
            }
            None => findings.add(Violation::new(
                ViolationKind::MissingArtifact,
                target.file.as_str(),
                format!("Missing compose file: {}", target.file),
            )),
        }
    }

    info!(
        files = files.len(),
        violations = findings.violations().len(),
        "Linted compose descriptors"
    );
    Ok(DescriptorLintReport { files, findings })
}
