//! Release gating for generated deployment projects.
//!
//! Checks a project root before and after promotion: per-stage contract
//! validation over the merged variables of an environment, the compose
//! descriptor and automation entrypoint contracts, cross-environment target
//! isolation, an append-only deployment record archive and the post-deploy
//! rollout decision.
//!
//! Problems a check exists to find are returned as
//! [`deploy_config::Violation`] data inside the check's report. [`Error`] is
//! reserved for conditions that prevent a report from being produced.

pub mod descriptor_contract;
pub mod entrypoint_contract;
pub mod errors;
pub mod isolation;
pub mod merged_vars;
pub mod record;
pub mod rollout;
pub mod stage_validator;

pub use descriptor_contract::{
    check_descriptor, discover_descriptors, lint_descriptors, AppliesTo, DescriptorLintReport,
    DescriptorTarget, TokenPredicate, TokenRule, DESCRIPTOR_CONTRACT,
};
pub use entrypoint_contract::{check_entrypoint, lint_entrypoint, EntrypointLintReport};
pub use errors::{Error, Result};
pub use isolation::{check_isolation, load_identities, IsolationReport, TargetIdentity};
pub use merged_vars::{entrypoint_defaults, MergedVars};
pub use record::{archive_record, RecordReceipt, RecordRequest, DEFAULT_ARCHIVE_FILE};
pub use rollout::{
    decide, read_json, RolloutDecision, RolloutStatus, RolloutThresholds, ServiceMetrics,
    SmokeResult,
};
pub use stage_validator::{
    stage_requirement, validate, validate_merged, StageReport, StageRequirement, StageStatus,
    STAGE_REQUIREMENTS,
};
