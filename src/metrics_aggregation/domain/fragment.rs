use super::{FieldKind, LargeArtifactRecord, MetricDomain, VulnerabilityRecord};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// A single metric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Count(u64),
    Measure(f64),
}

impl FieldValue {
    /// The zero value for a field of the given kind.
    pub fn zero(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Count => FieldValue::Count(0),
            FieldKind::Measure => FieldValue::Measure(0.0),
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            FieldValue::Count(n) => *n as f64,
            FieldValue::Measure(v) => *v,
        }
    }

    /// Truncating conversion; negative measures become zero.
    pub fn as_u64(&self) -> u64 {
        match self {
            FieldValue::Count(n) => *n,
            FieldValue::Measure(v) if v.is_finite() && *v > 0.0 => *v as u64,
            FieldValue::Measure(_) => 0,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Count(n) => write!(f, "{}", n),
            FieldValue::Measure(v) => write!(f, "{}", v),
        }
    }
}

/// Outcome of one parse attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseStatus {
    /// At least one schema field was extracted
    Ok,
    /// The artifact was readable but carried none of this domain's data
    NotFound,
    /// The artifact could not be parsed at all
    Malformed(String),
}

impl ParseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseStatus::Ok => "ok",
            ParseStatus::NotFound => "not_found",
            ParseStatus::Malformed(_) => "malformed",
        }
    }
}

/// Per-record detail carried alongside a fragment's counters.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FragmentDetail {
    #[default]
    None,
    Vulnerabilities(Vec<VulnerabilityRecord>),
    LargeArtifacts(Vec<LargeArtifactRecord>),
}

/// The parsed-but-not-yet-merged result of one source attempt for one domain.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFragment {
    domain: MetricDomain,
    origin: Option<PathBuf>,
    fields: BTreeMap<&'static str, FieldValue>,
    status: ParseStatus,
    detail: FragmentDetail,
}

impl MetricFragment {
    /// A fragment whose fields were extracted. Field names outside the
    /// domain's schema are dropped.
    pub fn ok(
        domain: MetricDomain,
        origin: Option<PathBuf>,
        fields: impl IntoIterator<Item = (&'static str, FieldValue)>,
    ) -> Self {
        let fields: BTreeMap<&'static str, FieldValue> = fields
            .into_iter()
            .filter(|(name, _)| domain.field(name).is_some())
            .collect();
        let status = if fields.is_empty() {
            ParseStatus::NotFound
        } else {
            ParseStatus::Ok
        };
        Self {
            domain,
            origin,
            fields,
            status,
            detail: FragmentDetail::None,
        }
    }

    pub fn not_found(domain: MetricDomain, origin: Option<PathBuf>) -> Self {
        Self {
            domain,
            origin,
            fields: BTreeMap::new(),
            status: ParseStatus::NotFound,
            detail: FragmentDetail::None,
        }
    }

    pub fn malformed(
        domain: MetricDomain,
        origin: Option<PathBuf>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            domain,
            origin,
            fields: BTreeMap::new(),
            status: ParseStatus::Malformed(details.into()),
            detail: FragmentDetail::None,
        }
    }

    pub fn with_detail(mut self, detail: FragmentDetail) -> Self {
        self.detail = detail;
        self
    }

    pub fn domain(&self) -> MetricDomain {
        self.domain
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    pub fn status(&self) -> &ParseStatus {
        &self.status
    }

    pub fn field(&self, name: &str) -> Option<FieldValue> {
        self.fields.get(name).copied()
    }

    pub fn fields(&self) -> &BTreeMap<&'static str, FieldValue> {
        &self.fields
    }

    pub fn detail(&self) -> &FragmentDetail {
        &self.detail
    }

    /// True when the fragment can win a merge: parsed `ok` with at least
    /// one extracted value.
    pub fn is_usable(&self) -> bool {
        self.status == ParseStatus::Ok && !self.fields.is_empty()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Option<PathBuf>,
        BTreeMap<&'static str, FieldValue>,
        FragmentDetail,
    ) {
        (self.origin, self.fields, self.detail)
    }
}
