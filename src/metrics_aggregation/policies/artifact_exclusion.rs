use crate::shared::error::MetricsError;
use crate::shared::Result;
use std::sync::atomic::{AtomicBool, Ordering};

/// Maximum number of user-supplied exclusion patterns
const MAX_EXCLUDE_PATTERNS: usize = 64;

/// Maximum length of a single exclusion pattern
const MAX_PATTERN_LENGTH: usize = 255;

/// Path components that belong to scan tooling, caches or editor state
/// rather than to the scanned repository.
pub const DEFAULT_TOOL_ARTIFACT_PATTERNS: &[&str] = &[
    "sonar-scanner*",
    "trivy*",
    "node_modules",
    ".cache",
    "__pycache__",
    ".pytest_cache",
    ".git",
    ".venv",
    "venv",
    ".idea",
    ".vscode",
];

/// Archive suffixes that are only tool artifacts when they sit under a tool path.
const ARCHIVE_SUFFIXES: &[&str] = &[".zip", ".tar.gz", ".tgz", ".deb", ".rpm"];

/// Substrings marking a path as belonging to downloaded scan tooling.
const TOOL_PATH_MARKERS: &[&str] = &["sonar-scanner", "trivy", "scanner", "tool"];

/// ArtifactExclusion - decides which tracked paths are scan-tool byproducts
///
/// A path is excluded when any of its components matches a pattern
/// (case-insensitive, `*` wildcards), or when it is an archive living
/// under a tool-looking path. The built-in patterns always apply; user
/// patterns are added on top.
#[derive(Debug)]
pub struct ArtifactExclusion {
    patterns: Vec<ExclusionPattern>,
}

impl ArtifactExclusion {
    /// Creates the exclusion policy from the built-in patterns plus `extra`
    ///
    /// # Errors
    /// - More than `MAX_EXCLUDE_PATTERNS` extra patterns
    /// - An extra pattern that is empty, too long, wildcard-only or has
    ///   characters outside `[A-Za-z0-9._-*]`
    pub fn new(extra: Vec<String>) -> Result<Self> {
        if extra.len() > MAX_EXCLUDE_PATTERNS {
            return Err(invalid_pattern(format!(
                "too many exclusion patterns: {} (maximum: {})",
                extra.len(),
                MAX_EXCLUDE_PATTERNS
            )));
        }

        let mut patterns: Vec<ExclusionPattern> = DEFAULT_TOOL_ARTIFACT_PATTERNS
            .iter()
            .map(|p| ExclusionPattern::builtin(p))
            .collect();

        for pattern in extra {
            patterns.push(ExclusionPattern::custom(pattern)?);
        }

        Ok(Self { patterns })
    }

    /// Returns true if `relative_path` should not count as a repository artifact.
    pub fn is_excluded(&self, relative_path: &str) -> bool {
        let lowered = relative_path.to_lowercase();
        let components: Vec<&str> = lowered
            .split(['/', '\\'])
            .filter(|c| !c.is_empty())
            .collect();

        // Evaluate every pattern so unmatched-pattern reporting stays accurate
        let mut excluded = false;
        for pattern in &self.patterns {
            if components.iter().any(|c| pattern.matches(c)) {
                excluded = true;
            }
        }

        excluded || is_tool_archive(&lowered)
    }

    /// User-supplied patterns that have not excluded any path so far.
    pub fn unmatched_custom_patterns(&self) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|p| p.custom && !p.matched.load(Ordering::Relaxed))
            .map(|p| p.original.clone())
            .collect()
    }
}

fn is_tool_archive(lowered_path: &str) -> bool {
    ARCHIVE_SUFFIXES.iter().any(|s| lowered_path.ends_with(s))
        && TOOL_PATH_MARKERS.iter().any(|m| lowered_path.contains(m))
}

#[derive(Debug)]
struct ExclusionPattern {
    original: String,
    matcher: ComponentMatcher,
    custom: bool,
    matched: AtomicBool,
}

impl ExclusionPattern {
    fn builtin(pattern: &str) -> Self {
        Self {
            original: pattern.to_string(),
            matcher: ComponentMatcher::compile(&pattern.to_lowercase()),
            custom: false,
            matched: AtomicBool::new(false),
        }
    }

    fn custom(pattern: String) -> Result<Self> {
        validate_pattern(&pattern)?;
        Ok(Self {
            matcher: ComponentMatcher::compile(&pattern.to_lowercase()),
            original: pattern,
            custom: true,
            matched: AtomicBool::new(false),
        })
    }

    fn matches(&self, component: &str) -> bool {
        let is_match = self.matcher.matches(component);
        if is_match {
            self.matched.store(true, Ordering::Relaxed);
        }
        is_match
    }
}

/// Matcher for one lowercased path component
#[derive(Debug, PartialEq)]
enum ComponentMatcher {
    /// "venv"
    Exact(String),
    /// "trivy*"
    StartsWith(String),
    /// "*.min.js"
    EndsWith(String),
    /// "*cache*"
    Contains(String),
    /// "sonar*scanner*cli": literal pieces in order, anchored at both
    /// ends unless the pattern starts or ends with '*'
    Glob {
        parts: Vec<String>,
        anchored_start: bool,
        anchored_end: bool,
    },
}

impl ComponentMatcher {
    fn compile(pattern: &str) -> Self {
        let anchored_start = !pattern.starts_with('*');
        let anchored_end = !pattern.ends_with('*');
        let parts: Vec<String> = pattern
            .split('*')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        match (parts.len(), anchored_start, anchored_end) {
            (1, true, true) => ComponentMatcher::Exact(parts[0].clone()),
            (1, true, false) => ComponentMatcher::StartsWith(parts[0].clone()),
            (1, false, true) => ComponentMatcher::EndsWith(parts[0].clone()),
            (1, false, false) => ComponentMatcher::Contains(parts[0].clone()),
            _ => ComponentMatcher::Glob {
                parts,
                anchored_start,
                anchored_end,
            },
        }
    }

    fn matches(&self, component: &str) -> bool {
        match self {
            ComponentMatcher::Exact(s) => component == s,
            ComponentMatcher::StartsWith(prefix) => component.starts_with(prefix.as_str()),
            ComponentMatcher::EndsWith(suffix) => component.ends_with(suffix.as_str()),
            ComponentMatcher::Contains(middle) => component.contains(middle.as_str()),
            ComponentMatcher::Glob {
                parts,
                anchored_start,
                anchored_end,
            } => glob_matches(component, parts, *anchored_start, *anchored_end),
        }
    }
}

fn glob_matches(
    component: &str,
    parts: &[String],
    anchored_start: bool,
    anchored_end: bool,
) -> bool {
    let mut rest = component;
    for (i, part) in parts.iter().enumerate() {
        if i == 0 && anchored_start {
            match rest.strip_prefix(part.as_str()) {
                Some(r) => rest = r,
                None => return false,
            }
        } else if i == parts.len() - 1 && anchored_end {
            return rest.len() >= part.len() && rest.ends_with(part.as_str());
        } else {
            match rest.find(part.as_str()) {
                Some(pos) => rest = &rest[pos + part.len()..],
                None => return false,
            }
        }
    }
    !anchored_end || rest.is_empty()
}

fn invalid_pattern(reason: String) -> anyhow::Error {
    MetricsError::InvalidConfiguration {
        field: "exclude_patterns".to_string(),
        reason,
    }
    .into()
}

fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        return Err(invalid_pattern("pattern cannot be empty".to_string()));
    }

    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(invalid_pattern(format!(
            "pattern is too long: '{}' ({} chars). Maximum: {} chars",
            pattern,
            pattern.len(),
            MAX_PATTERN_LENGTH
        )));
    }

    if let Some(ch) = pattern
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '*')))
    {
        return Err(invalid_pattern(format!(
            "invalid character '{}' in pattern '{}'. Patterns match a single path \
             component: only alphanumerics, hyphens, underscores, dots and '*' are allowed.",
            ch, pattern
        )));
    }

    if pattern.chars().all(|c| c == '*') {
        return Err(invalid_pattern(format!(
            "pattern cannot contain only wildcards: '{}'",
            pattern
        )));
    }

    Ok(())
}
