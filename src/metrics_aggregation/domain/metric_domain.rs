use std::fmt;
use std::path::PathBuf;

/// Whether a schema field holds a whole-number count or a real measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Count,
    Measure,
}

/// One named field in a domain's fixed schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn count(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Count,
    }
}

const fn measure(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Measure,
    }
}

const COVERAGE_SCHEMA: &[FieldSpec] = &[measure("percent")];

const VULNERABILITY_SCHEMA: &[FieldSpec] = &[
    count("critical"),
    count("high"),
    count("medium"),
    count("low"),
    count("total"),
];

const QUALITY_SCHEMA: &[FieldSpec] = &[
    count("todo_comments"),
    count("debug_statements"),
    count("large_files"),
    count("total_improvements"),
    count("files_scanned"),
];

const UNIT_TEST_SCHEMA: &[FieldSpec] = &[
    count("total"),
    count("passed"),
    count("failed"),
    count("skipped"),
    measure("coverage"),
    measure("duration_seconds"),
];

const PERFORMANCE_TEST_SCHEMA: &[FieldSpec] = &[
    count("total"),
    count("passed"),
    count("failed"),
    measure("avg_response_time_ms"),
    measure("p95_response_time_ms"),
    measure("p99_response_time_ms"),
    measure("error_rate"),
    measure("throughput_rps"),
];

const LARGE_ARTIFACT_SCHEMA: &[FieldSpec] = &[count("count"), count("total_bytes")];

/// A category of scan metric.
///
/// Each domain owns a fixed schema; downstream renderers read snapshot
/// fields by these names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricDomain {
    Coverage,
    Vulnerabilities,
    QualityIssues,
    UnitTests,
    PerformanceTests,
    LargeArtifacts,
}

impl MetricDomain {
    /// Every domain, in snapshot order.
    pub const ALL: [MetricDomain; 6] = [
        MetricDomain::Coverage,
        MetricDomain::Vulnerabilities,
        MetricDomain::QualityIssues,
        MetricDomain::UnitTests,
        MetricDomain::PerformanceTests,
        MetricDomain::LargeArtifacts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricDomain::Coverage => "coverage",
            MetricDomain::Vulnerabilities => "vulnerabilities",
            MetricDomain::QualityIssues => "quality_issues",
            MetricDomain::UnitTests => "unit_tests",
            MetricDomain::PerformanceTests => "performance_tests",
            MetricDomain::LargeArtifacts => "large_artifacts",
        }
    }

    pub fn schema(&self) -> &'static [FieldSpec] {
        match self {
            MetricDomain::Coverage => COVERAGE_SCHEMA,
            MetricDomain::Vulnerabilities => VULNERABILITY_SCHEMA,
            MetricDomain::QualityIssues => QUALITY_SCHEMA,
            MetricDomain::UnitTests => UNIT_TEST_SCHEMA,
            MetricDomain::PerformanceTests => PERFORMANCE_TEST_SCHEMA,
            MetricDomain::LargeArtifacts => LARGE_ARTIFACT_SCHEMA,
        }
    }

    /// Looks up a schema field by name.
    pub fn field(&self, name: &str) -> Option<FieldSpec> {
        self.schema().iter().copied().find(|spec| spec.name == name)
    }

    /// Position of this domain in [`MetricDomain::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Large artifacts come from the tracked-file scan, never from a report file.
    pub fn is_file_backed(&self) -> bool {
        !matches!(self, MetricDomain::LargeArtifacts)
    }
}

impl fmt::Display for MetricDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The shape of an artifact on disk, which selects the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactFormat {
    /// `Results[].Vulnerabilities[]` scanner report
    TrivyJson,
    /// JSON carrying a coverage percentage
    CoverageJson,
    /// Cobertura-style XML with `line-rate` or `lines-valid`/`lines-covered`
    CoberturaXml,
    /// LCOV tracefile (`LF:`/`LH:` records)
    Lcov,
    /// Free text with a coverage label followed by a number
    CoverageText,
    /// Free-text quality scan summary with labelled counters
    QualityText,
    /// Unit or performance test result JSON
    TestResultsJson,
}

impl ArtifactFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactFormat::TrivyJson => "trivy-json",
            ArtifactFormat::CoverageJson => "coverage-json",
            ArtifactFormat::CoberturaXml => "cobertura-xml",
            ArtifactFormat::Lcov => "lcov",
            ArtifactFormat::CoverageText => "coverage-text",
            ArtifactFormat::QualityText => "quality-text",
            ArtifactFormat::TestResultsJson => "test-results-json",
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (path, format) entry of a domain's ordered candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCandidate {
    pub path: PathBuf,
    pub format: ArtifactFormat,
}

impl SourceCandidate {
    pub fn new(path: impl Into<PathBuf>, format: ArtifactFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }
}
