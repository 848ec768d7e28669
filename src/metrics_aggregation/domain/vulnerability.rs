use std::fmt;

/// Vulnerability severity as reported by the scanner.
///
/// Only the four named buckets are tallied individually; anything else
/// lands in `Unknown` and is counted in the total alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl Severity {
    /// Case-insensitive parse. Unrecognized strings map to `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "CRITICAL" => Severity::Critical,
            "HIGH" => Severity::High,
            "MEDIUM" => Severity::Medium,
            "LOW" => Severity::Low,
            _ => Severity::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Unknown => "UNKNOWN",
        }
    }

    /// Schema field this severity is tallied into, if any.
    pub fn bucket(&self) -> Option<&'static str> {
        match self {
            Severity::Critical => Some("critical"),
            Severity::High => Some("high"),
            Severity::Medium => Some("medium"),
            Severity::Low => Some("low"),
            Severity::Unknown => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding from a dependency-vulnerability report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VulnerabilityRecord {
    pub id: String,
    pub package: String,
    pub installed_version: String,
    pub fixed_version: Option<String>,
    pub severity: Severity,
    pub title: String,
}

impl VulnerabilityRecord {
    /// Identity used for deduplication: the same advisory reported twice
    /// for one package (e.g. from two targets in one image) counts once.
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.id, &self.package)
    }
}
