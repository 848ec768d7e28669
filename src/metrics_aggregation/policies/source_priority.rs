use crate::metrics_aggregation::domain::MetricFragment;

/// SourcePriority policy for choosing between competing sources
///
/// Priority order within a domain is the order of its candidate list:
/// 1. The first fragment parsed `ok` with at least one extracted value
/// 2. Nothing (the domain is reported absent)
///
/// A present zero is a real value. A later source never overrides an
/// earlier one just because the earlier value was zero.
pub struct SourcePriority;

impl SourcePriority {
    /// Selects the winning fragment from fragments given in priority order
    ///
    /// # Returns
    /// The first usable fragment, or None if every attempt was
    /// `not_found` or `malformed`
    pub fn select(fragments: impl IntoIterator<Item = MetricFragment>) -> Option<MetricFragment> {
        fragments.into_iter().find(MetricFragment::is_usable)
    }

    /// Chooses the coverage percentage
    ///
    /// The static-analysis service value is used only when no artifact
    /// produced a coverage value at all; a file-derived 0.0 stands.
    pub fn select_coverage(file_value: Option<f64>, service_value: Option<f64>) -> Option<f64> {
        file_value.or(service_value)
    }

    /// Resolves a reported total against its sub-counters
    ///
    /// # Returns
    /// The explicit total if one was reported, otherwise the sum of `parts`
    pub fn resolve_total(explicit: Option<u64>, parts: &[u64]) -> u64 {
        explicit.unwrap_or_else(|| parts.iter().sum())
    }
}
