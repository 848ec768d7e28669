use crate::metrics_aggregation::domain::{CanonicalSnapshot, MetricDomain};

/// Penalty per unit of each tracked deficiency
pub const TODO_COMMENT_WEIGHT: f64 = 0.1;
pub const DEBUG_STATEMENT_WEIGHT: f64 = 0.05;
pub const LARGE_FILE_WEIGHT: f64 = 0.5;
pub const CRITICAL_VULNERABILITY_WEIGHT: f64 = 5.0;
pub const HIGH_VULNERABILITY_WEIGHT: f64 = 2.0;
pub const STATIC_ANALYSIS_BUG_WEIGHT: f64 = 0.3;
pub const STATIC_ANALYSIS_VULNERABILITY_WEIGHT: f64 = 1.0;

const MAX_SCORE: f64 = 100.0;

/// Inputs to the quality score, pulled out of a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreInputs {
    pub todo_comments: u64,
    pub debug_statements: u64,
    pub large_files: u64,
    pub critical_vulnerabilities: u64,
    pub high_vulnerabilities: u64,
    pub static_analysis_bugs: u64,
    pub static_analysis_vulnerabilities: u64,
}

impl ScoreInputs {
    pub fn from_snapshot(snapshot: &CanonicalSnapshot) -> Self {
        let quality = snapshot.domain(MetricDomain::QualityIssues);
        let vulnerabilities = snapshot.domain(MetricDomain::Vulnerabilities);
        let static_analysis = snapshot.static_analysis();
        Self {
            todo_comments: quality.count("todo_comments"),
            debug_statements: quality.count("debug_statements"),
            large_files: snapshot.domain(MetricDomain::LargeArtifacts).count("count"),
            critical_vulnerabilities: vulnerabilities.count("critical"),
            high_vulnerabilities: vulnerabilities.count("high"),
            static_analysis_bugs: static_analysis.map(|r| r.bugs).unwrap_or(0),
            static_analysis_vulnerabilities: static_analysis
                .map(|r| r.vulnerabilities)
                .unwrap_or(0),
        }
    }

    fn penalty(&self) -> f64 {
        self.todo_comments as f64 * TODO_COMMENT_WEIGHT
            + self.debug_statements as f64 * DEBUG_STATEMENT_WEIGHT
            + self.large_files as f64 * LARGE_FILE_WEIGHT
            + self.critical_vulnerabilities as f64 * CRITICAL_VULNERABILITY_WEIGHT
            + self.high_vulnerabilities as f64 * HIGH_VULNERABILITY_WEIGHT
            + self.static_analysis_bugs as f64 * STATIC_ANALYSIS_BUG_WEIGHT
            + self.static_analysis_vulnerabilities as f64 * STATIC_ANALYSIS_VULNERABILITY_WEIGHT
    }
}

/// ScoreCalculator - bounded weighted-deficiency quality score
///
/// `100 - sum(count * weight)`, clamped to [0, 100] and rounded to two
/// decimals. Large files come from the tracked-file scan.
pub struct ScoreCalculator;

impl ScoreCalculator {
    pub fn score(snapshot: &CanonicalSnapshot) -> f64 {
        Self::score_inputs(&ScoreInputs::from_snapshot(snapshot))
    }

    pub fn score_inputs(inputs: &ScoreInputs) -> f64 {
        let raw = (MAX_SCORE - inputs.penalty()).clamp(0.0, MAX_SCORE);
        (raw * 100.0).round() / 100.0
    }
}
