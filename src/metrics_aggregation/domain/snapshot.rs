use super::{
    FieldValue, FragmentDetail, LargeArtifactRecord, MetricDomain, MetricFragment,
    RepositoryIdentity, StaticAnalysisReport, VulnerabilityRecord,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Where a domain's values came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainPresence {
    /// A source produced usable values; `origin` names it.
    Present { origin: String },
    /// No source produced usable values. All fields are zero, which must
    /// not be read as "verified clean".
    Absent,
}

/// One domain's merged values, always carrying every schema field.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainSnapshot {
    domain: MetricDomain,
    presence: DomainPresence,
    fields: BTreeMap<&'static str, FieldValue>,
    detail: FragmentDetail,
}

impl DomainSnapshot {
    /// All-zero snapshot for a domain no source could fill.
    pub fn absent(domain: MetricDomain) -> Self {
        Self {
            domain,
            presence: DomainPresence::Absent,
            fields: Self::zeroed(domain),
            detail: FragmentDetail::None,
        }
    }

    /// Promotes the winning fragment, zero-filling schema fields it lacked.
    pub fn from_fragment(fragment: MetricFragment) -> Self {
        let domain = fragment.domain();
        let (origin, extracted, detail) = fragment.into_parts();
        let mut fields = Self::zeroed(domain);
        fields.extend(extracted);
        let origin = origin
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Self {
            domain,
            presence: DomainPresence::Present { origin },
            fields,
            detail,
        }
    }

    /// Present snapshot built from values computed in-process rather than parsed.
    pub fn derived(
        domain: MetricDomain,
        origin: impl Into<String>,
        values: impl IntoIterator<Item = (&'static str, FieldValue)>,
        detail: FragmentDetail,
    ) -> Self {
        let mut fields = Self::zeroed(domain);
        for (name, value) in values {
            if domain.field(name).is_some() {
                fields.insert(name, value);
            }
        }
        Self {
            domain,
            presence: DomainPresence::Present {
                origin: origin.into(),
            },
            fields,
            detail,
        }
    }

    fn zeroed(domain: MetricDomain) -> BTreeMap<&'static str, FieldValue> {
        domain
            .schema()
            .iter()
            .map(|spec| (spec.name, FieldValue::zero(spec.kind)))
            .collect()
    }

    pub fn domain(&self) -> MetricDomain {
        self.domain
    }

    pub fn presence(&self) -> &DomainPresence {
        &self.presence
    }

    pub fn is_present(&self) -> bool {
        matches!(self.presence, DomainPresence::Present { .. })
    }

    pub fn origin(&self) -> Option<&str> {
        match &self.presence {
            DomainPresence::Present { origin } => Some(origin.as_str()),
            DomainPresence::Absent => None,
        }
    }

    pub fn fields(&self) -> &BTreeMap<&'static str, FieldValue> {
        &self.fields
    }

    /// Field value, or zero when the name is not in the schema.
    pub fn value(&self, name: &str) -> f64 {
        self.fields.get(name).map(FieldValue::as_f64).unwrap_or(0.0)
    }

    pub fn count(&self, name: &str) -> u64 {
        self.fields.get(name).map(FieldValue::as_u64).unwrap_or(0)
    }

    /// Overwrites a schema field. Names outside the schema are ignored.
    pub(crate) fn set(&mut self, name: &'static str, value: FieldValue) {
        if self.domain.field(name).is_some() {
            self.fields.insert(name, value);
        }
    }

    pub fn vulnerabilities(&self) -> &[VulnerabilityRecord] {
        match &self.detail {
            FragmentDetail::Vulnerabilities(records) => records,
            _ => &[],
        }
    }

    pub fn large_artifacts(&self) -> &[LargeArtifactRecord] {
        match &self.detail {
            FragmentDetail::LargeArtifacts(records) => records,
            _ => &[],
        }
    }
}

/// Identifiers of the CI run that produced a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunIdentity {
    pub run_id: String,
    pub run_number: Option<u64>,
}

/// The fully merged metric state for one pipeline run.
///
/// Built once by the aggregator; the only mutation afterwards is attaching
/// the quality score, which consumes and returns the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalSnapshot {
    repository: RepositoryIdentity,
    run: RunIdentity,
    collected_at: DateTime<Utc>,
    domains: Vec<DomainSnapshot>,
    static_analysis: Option<StaticAnalysisReport>,
    quality_score: Option<f64>,
}

impl CanonicalSnapshot {
    /// Builds a snapshot holding exactly one entry per domain; domains
    /// missing from `merged` are filled as absent.
    pub fn new(
        repository: RepositoryIdentity,
        run: RunIdentity,
        collected_at: DateTime<Utc>,
        mut merged: BTreeMap<MetricDomain, DomainSnapshot>,
        static_analysis: Option<StaticAnalysisReport>,
    ) -> Self {
        let domains = MetricDomain::ALL
            .iter()
            .map(|domain| {
                merged
                    .remove(domain)
                    .unwrap_or_else(|| DomainSnapshot::absent(*domain))
            })
            .collect();
        Self {
            repository,
            run,
            collected_at,
            domains,
            static_analysis,
            quality_score: None,
        }
    }

    pub fn with_quality_score(mut self, score: f64) -> Self {
        self.quality_score = Some(score);
        self
    }

    pub fn repository(&self) -> &RepositoryIdentity {
        &self.repository
    }

    pub fn run(&self) -> &RunIdentity {
        &self.run
    }

    pub fn collected_at(&self) -> DateTime<Utc> {
        self.collected_at
    }

    pub fn domain(&self, domain: MetricDomain) -> &DomainSnapshot {
        &self.domains[domain.index()]
    }

    pub fn domains(&self) -> &[DomainSnapshot] {
        &self.domains
    }

    pub fn static_analysis(&self) -> Option<&StaticAnalysisReport> {
        self.static_analysis.as_ref()
    }

    pub fn quality_score(&self) -> Option<f64> {
        self.quality_score
    }

    /// Number of schema fields backed by a real source across all domains.
    pub fn fields_collected(&self) -> usize {
        self.domains
            .iter()
            .filter(|d| d.is_present())
            .map(|d| d.fields().len())
            .sum()
    }

    /// Origins of every present domain, keyed by domain.
    pub fn origins(&self) -> BTreeMap<MetricDomain, PathBuf> {
        self.domains
            .iter()
            .filter_map(|d| d.origin().map(|o| (d.domain(), PathBuf::from(o))))
            .collect()
    }
}
