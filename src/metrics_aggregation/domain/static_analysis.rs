use std::collections::BTreeMap;

/// Issue severities reported by the static-analysis service, in display order.
pub const ISSUE_SEVERITIES: [&str; 5] = ["BLOCKER", "CRITICAL", "MAJOR", "MINOR", "INFO"];

/// One open issue from the static-analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAnalysisIssue {
    pub key: String,
    pub issue_type: String,
    pub severity: String,
    /// Project-relative file path (the component key without its project prefix)
    pub file: String,
    pub line: Option<u64>,
}

/// Measures and open issues fetched from the static-analysis service.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StaticAnalysisReport {
    /// `None` when the service reported no coverage measure at all
    pub coverage: Option<f64>,
    pub bugs: u64,
    pub vulnerabilities: u64,
    pub code_smells: u64,
    pub issues_by_severity: BTreeMap<String, u64>,
    pub issues: Vec<StaticAnalysisIssue>,
}

impl StaticAnalysisReport {
    /// Count for one severity facet; missing facets are zero.
    pub fn issues_with_severity(&self, severity: &str) -> u64 {
        self.issues_by_severity.get(severity).copied().unwrap_or(0)
    }
}
