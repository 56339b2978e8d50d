use serde::{Deserialize, Serialize};

/// Confidence scores live on a fixed 20..=95 band. Heuristic, not a
/// probability.
pub const MIN_CONFIDENCE: i32 = 20;
pub const MAX_CONFIDENCE: i32 = 95;

/// How hard the offer leans relative to list price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Aggressive,
    Competitive,
    Balanced,
    Conservative,
}

impl StrategyKind {
    /// Bucket from the offer-to-list ratio. Comparisons are strict:
    /// exactly 98% of list is competitive, not aggressive.
    pub fn from_offer_ratio(ratio: f64) -> Self {
        if ratio > 0.98 {
            Self::Aggressive
        } else if ratio > 0.95 {
            Self::Competitive
        } else if ratio > 0.90 {
            Self::Balanced
        } else {
            Self::Conservative
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Aggressive => "aggressive",
            Self::Competitive => "competitive",
            Self::Balanced => "balanced",
            Self::Conservative => "conservative",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationClause {
    pub max_price: f64,
    pub increment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractTerms {
    /// Days.
    pub inspection_period: u32,
    /// Days.
    pub financing_contingency: u32,
    pub appraisal_contingency: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation_clause: Option<EscalationClause>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneImportance {
    Critical,
    Important,
    Flexible,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub milestone: String,
    pub date: String,
    pub importance: MilestoneImportance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferTimeline {
    pub response_deadline: String,
    pub close_date: String,
    pub key_milestones: Vec<Milestone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferStrategy {
    pub recommended_offer: f64,
    /// Always recommended_offer / listing_price * 100.
    pub offer_percentage: f64,
    pub confidence: i32,
    pub strategy: StrategyKind,
    pub reasoning: String,
    pub terms: ContractTerms,
    pub negotiation_tips: Vec<String>,
    pub risk_factors: Vec<String>,
    pub strengths: Vec<String>,
    pub timeline: OfferTimeline,
}

/// One full engine answer: the recommended play, bracketing variants,
/// and the market story behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferStrategies {
    pub primary_strategy: OfferStrategy,
    pub alternative_strategies: Vec<OfferStrategy>,
    pub market_summary: String,
    pub competitive_analysis: String,
    pub recommended_approach: String,
}
