use serde::{Deserialize, Deserializer, Serialize};

/// Caps at or above this value mean "no cap". The service's unlimited plan
/// reports 999999 rather than a dedicated marker.
pub const UNBOUNDED_SENTINEL: u64 = 999_999;

/// Cap assumed when the service omits `max_matches` (free plan).
pub const DEFAULT_MAX_MATCHES: u32 = 10;

/// A single ranked job posting returned by the match endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatch {
    pub job_position: String,
    pub company: String,
    /// 0 – 100, may carry one decimal place.
    pub match_percentage: f64,
    pub apply_url: String,
}

impl JobMatch {
    pub fn rounded_percentage(&self) -> u32 {
        self.match_percentage.clamp(0.0, 100.0).round() as u32
    }
}

/// Per-search cap reported by the service for the user's plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxMatches {
    Limited(u32),
    Unbounded,
}

impl Default for MaxMatches {
    fn default() -> Self {
        MaxMatches::Limited(DEFAULT_MAX_MATCHES)
    }
}

impl MaxMatches {
    fn from_raw(raw: Option<f64>) -> Self {
        match raw {
            None => MaxMatches::Unbounded,
            Some(v) if !v.is_finite() || v >= UNBOUNDED_SENTINEL as f64 => MaxMatches::Unbounded,
            Some(v) => MaxMatches::Limited(v.max(0.0) as u32),
        }
    }
}

/// Missing field → default cap; explicit `null` → unbounded.
fn deserialize_max_matches<'de, D>(deserializer: D) -> Result<MaxMatches, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(MaxMatches::from_raw(raw))
}

/// Body of a successful match response. Server order of `matches` is kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MatchSet {
    #[serde(default)]
    pub matches: Vec<JobMatch>,
    #[serde(default, deserialize_with = "deserialize_max_matches")]
    pub max_matches: MaxMatches,
    /// Roles the matcher inferred from the submitted skills.
    #[serde(default)]
    pub potential_roles: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}
