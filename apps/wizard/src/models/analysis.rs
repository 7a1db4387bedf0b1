use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Analysis payload returned for `analysis_complete` and as `new_analysis_result`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub match_score: Option<f64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub suggested_changes: Vec<String>,
    #[serde(default)]
    pub scoring_breakdown: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnalysisResult {
    /// Match score, 0 when the backend omitted it.
    pub fn score(&self) -> f64 {
        self.match_score.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Weak,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => ScoreBand::Excellent,
            s if s >= 60.0 => ScoreBand::Good,
            s if s >= 40.0 => ScoreBand::Fair,
            _ => ScoreBand::Weak,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent match",
            ScoreBand::Good => "Good match",
            ScoreBand::Fair => "Fair match",
            ScoreBand::Weak => "Needs improvement",
        }
    }
}

/// A displayed score, optionally compared against the session baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreComparison {
    pub current: f64,
    pub baseline: Option<f64>,
}

impl ScoreComparison {
    pub fn delta(&self) -> Option<f64> {
        self.baseline.map(|baseline| self.current - baseline)
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.current)
    }
}

/// What the results panel shows: the latest analysis and its score comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisDisplay {
    pub result: AnalysisResult,
    pub comparison: ScoreComparison,
}

impl AnalysisDisplay {
    pub fn new(result: AnalysisResult, baseline: Option<f64>) -> Self {
        let comparison = ScoreComparison {
            current: result.score(),
            baseline,
        };
        Self { result, comparison }
    }
}
