//! Project metrics snapshot.

use serde::{Deserialize, Serialize};

/// Vulnerability and policy metrics of a project, as last computed by the
/// server. Read-only; the server ignores it in request bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectMetrics {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub unassigned: u32,
    /// Total number of vulnerabilities.
    pub vulnerabilities: u32,
    /// Components with at least one vulnerability.
    pub vulnerable_components: u32,
    pub components: u32,
    pub suppressed: u32,
    pub findings_total: u32,
    pub findings_audited: u32,
    pub findings_unaudited: u32,
    pub inherited_risk_score: f64,
    pub policy_violations_fail: u32,
    pub policy_violations_warn: u32,
    pub policy_violations_info: u32,
    pub policy_violations_total: u32,
    /// Epoch milliseconds.
    pub first_occurrence: i64,
    /// Epoch milliseconds.
    pub last_occurrence: i64,
}

impl ProjectMetrics {
    /// Whether any critical or high severity vulnerability is present.
    pub fn has_severe(&self) -> bool {
        self.critical > 0 || self.high > 0
    }
}
