//! Post-deploy rollout decision.
//!
//! Decides from a smoke result and optional service metrics whether a
//! deployment stays or must be rolled back. Inputs are JSON documents
//! produced by external probes; nothing here touches the network.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[cfg(test)]
#[path = "rollout_tests.rs"]
mod tests;

/// Smoke test result document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SmokeResult {
    #[serde(default)]
    pub dry_run: Option<bool>,
    #[serde(default)]
    pub critical_path_ok: Option<bool>,
}

/// Service metrics document. Absent values count as failing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceMetrics {
    #[serde(default)]
    pub success_rate: Option<f64>,
    #[serde(default)]
    pub p95_latency_ms: Option<f64>,
}

impl ServiceMetrics {
    pub fn success_rate(&self) -> f64 {
        self.success_rate.unwrap_or(0.0)
    }

    pub fn p95_latency_ms(&self) -> f64 {
        self.p95_latency_ms.unwrap_or(1e9)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RolloutThresholds {
    pub min_success_rate: f64,
    pub max_p95_latency: f64,
}

impl Default for RolloutThresholds {
    fn default() -> Self {
        Self {
            min_success_rate: 99.0,
            max_p95_latency: 500.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloutStatus {
    Ok,
    Skipped,
    RollbackRequired,
}

impl fmt::Display for RolloutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RolloutStatus::Ok => write!(f, "ok"),
            RolloutStatus::Skipped => write!(f, "skipped"),
            RolloutStatus::RollbackRequired => write!(f, "rollback_required"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RolloutDecision {
    pub status: RolloutStatus,
    pub smoke_ok: bool,
    pub metrics_ok: bool,
    pub thresholds: RolloutThresholds,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

/// Decides the rollout outcome.
///
/// A dry-run smoke that did not report the critical path is skipped. Metrics
/// are only evaluated when given.
pub fn decide(
    smoke: &SmokeResult,
    metrics: Option<&ServiceMetrics>,
    thresholds: RolloutThresholds,
) -> RolloutDecision {
    if smoke.dry_run == Some(true) && smoke.critical_path_ok.is_none() {
        info!("Dry-run smoke without critical path result; skipping decision");
        return RolloutDecision {
            status: RolloutStatus::Skipped,
            smoke_ok: false,
            metrics_ok: false,
            thresholds,
            reasons: vec!["smoke was a dry run".to_string()],
        };
    }

    let mut reasons = Vec::new();
    let smoke_ok = smoke.critical_path_ok == Some(true);
    if !smoke_ok {
        reasons.push("critical path smoke failed".to_string());
    }

    let mut metrics_ok = true;
    if let Some(metrics) = metrics {
        if metrics.success_rate() < thresholds.min_success_rate {
            metrics_ok = false;
            reasons.push(format!(
                "success rate {} below {}",
                metrics.success_rate(),
                thresholds.min_success_rate
            ));
        }
        if metrics.p95_latency_ms() > thresholds.max_p95_latency {
            metrics_ok = false;
            reasons.push(format!(
                "p95 latency {}ms above {}ms",
                metrics.p95_latency_ms(),
                thresholds.max_p95_latency
            ));
        }
    }

    let status = if smoke_ok && metrics_ok {
        RolloutStatus::Ok
    } else {
        warn!(reasons = ?reasons, "Rollback required");
        RolloutStatus::RollbackRequired
    };

    RolloutDecision {
        status,
        smoke_ok,
        metrics_ok,
        thresholds,
        reasons,
    }
}

/// Reads a JSON document.
///
/// # Errors
///
/// `Error::Io` when the file cannot be read, `Error::Json` when it is not a
/// valid document of the expected shape.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| Error::Json {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
