use crate::metrics_aggregation::domain::{ArtifactFormat, MetricDomain, SourceCandidate};
use crate::ports::outbound::ArtifactReader;
use std::path::PathBuf;

/// Directories searched for artifacts, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRoots {
    /// Shared scratch directory (e.g. `/tmp`)
    pub scratch: PathBuf,
    /// Directory the scan jobs copy their results into
    pub results: PathBuf,
    /// The pipeline's working directory
    pub working: PathBuf,
}

impl SearchRoots {
    pub fn new(
        scratch: impl Into<PathBuf>,
        results: impl Into<PathBuf>,
        working: impl Into<PathBuf>,
    ) -> Self {
        Self {
            scratch: scratch.into(),
            results: results.into(),
            working: working.into(),
        }
    }

    fn in_order(&self) -> [&PathBuf; 3] {
        [&self.scratch, &self.results, &self.working]
    }
}

impl Default for SearchRoots {
    fn default() -> Self {
        Self::new("/tmp", "/tmp/scan-results", ".")
    }
}

const VULNERABILITY_SOURCES: &[(&str, ArtifactFormat)] = &[
    ("trivy-results.json", ArtifactFormat::TrivyJson),
    ("trivy-fs-results.json", ArtifactFormat::TrivyJson),
];

const COVERAGE_SOURCES: &[(&str, ArtifactFormat)] = &[
    ("test-results.json", ArtifactFormat::CoverageJson),
    ("coverage.json", ArtifactFormat::CoverageJson),
    ("coverage.xml", ArtifactFormat::CoberturaXml),
    ("lcov.info", ArtifactFormat::Lcov),
    ("test-results.txt", ArtifactFormat::CoverageText),
    ("quality-results.txt", ArtifactFormat::CoverageText),
];

const QUALITY_SOURCES: &[(&str, ArtifactFormat)] = &[
    ("quality-results.txt", ArtifactFormat::QualityText),
    ("scan-metrics.txt", ArtifactFormat::QualityText),
];

const UNIT_TEST_SOURCES: &[(&str, ArtifactFormat)] = &[
    ("unit-test-results.json", ArtifactFormat::TestResultsJson),
    ("test-results.json", ArtifactFormat::TestResultsJson),
];

const PERFORMANCE_TEST_SOURCES: &[(&str, ArtifactFormat)] = &[
    ("performance-test-results.json", ArtifactFormat::TestResultsJson),
    ("test-results.json", ArtifactFormat::TestResultsJson),
];

/// SourceLocator - finds scan artifacts for a domain
///
/// Candidates are ordered file-name-major: every root is tried for the
/// first file name before the next file name is considered, so a
/// structured report anywhere beats a text summary anywhere.
#[derive(Debug, Clone)]
pub struct SourceLocator {
    roots: SearchRoots,
}

impl SourceLocator {
    pub fn new(roots: SearchRoots) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &SearchRoots {
        &self.roots
    }

    /// Full ordered candidate list for a domain, existing or not.
    pub fn candidates(&self, domain: MetricDomain) -> Vec<SourceCandidate> {
        Self::table(domain)
            .iter()
            .flat_map(|(file_name, format)| {
                self.roots
                    .in_order()
                    .into_iter()
                    .map(move |root| SourceCandidate::new(root.join(file_name), *format))
            })
            .collect()
    }

    /// Returns the first candidate that exists and is readable.
    ///
    /// `None` is the normal outcome for a domain nobody produced.
    pub fn locate<R: ArtifactReader + ?Sized>(
        &self,
        domain: MetricDomain,
        reader: &R,
    ) -> Option<SourceCandidate> {
        self.candidates(domain)
            .into_iter()
            .find(|candidate| reader.exists(&candidate.path))
    }

    /// Every existing candidate, in precedence order.
    ///
    /// Lets the aggregator fall through to the next source when an
    /// earlier one turns out malformed.
    pub fn locate_all<R: ArtifactReader + ?Sized>(
        &self,
        domain: MetricDomain,
        reader: &R,
    ) -> Vec<SourceCandidate> {
        let mut found: Vec<SourceCandidate> = Vec::new();
        for candidate in self.candidates(domain) {
            // The same file can be reached twice when roots overlap (e.g. working dir == /tmp)
            if reader.exists(&candidate.path) && !found.iter().any(|f| f == &candidate) {
                found.push(candidate);
            }
        }
        found
    }

    fn table(domain: MetricDomain) -> &'static [(&'static str, ArtifactFormat)] {
        match domain {
            MetricDomain::Vulnerabilities => VULNERABILITY_SOURCES,
            MetricDomain::Coverage => COVERAGE_SOURCES,
            MetricDomain::QualityIssues => QUALITY_SOURCES,
            MetricDomain::UnitTests => UNIT_TEST_SOURCES,
            MetricDomain::PerformanceTests => PERFORMANCE_TEST_SOURCES,
            MetricDomain::LargeArtifacts => &[],
        }
    }
}
