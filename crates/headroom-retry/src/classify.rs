//! Text-based classification of type-erased errors.

/// Decides whether an opaque error looks transient by scanning its message
/// for known substrings.
///
/// This is the fallback used by
/// [`Retryer::run_auto`](crate::Retryer::run_auto) when an error is not an
/// [`ApiError`](headroom_core::ApiError) and so carries no status code to
/// classify on. Matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct TextClassifier {
    patterns: Vec<String>,
}

impl TextClassifier {
    /// The substrings recognized by default: the usual phrasings of
    /// network hiccups, timeouts, and overload.
    pub const DEFAULT_PATTERNS: [&'static str; 8] = [
        "timeout",
        "timed out",
        "connection refused",
        "connection reset",
        "temporarily unavailable",
        "service unavailable",
        "too many requests",
        "try again",
    ];

    /// Creates a classifier that matches exactly `patterns`.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TextClassifier {
            patterns: patterns
                .into_iter()
                .map(|p| p.into().to_lowercase())
                .collect(),
        }
    }

    /// Adds one more substring to match.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into().to_lowercase());
        self
    }

    /// Returns `true` if `text` contains any known pattern.
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.patterns.iter().any(|p| text.contains(p))
    }
}

impl Default for TextClassifier {
    fn default() -> Self {
        TextClassifier::new(Self::DEFAULT_PATTERNS)
    }
}
