use crate::domain::strategy::{
    ContractTerms, EscalationClause, Milestone, OfferStrategy, OfferTimeline, StrategyKind,
    MAX_CONFIDENCE, MIN_CONFIDENCE,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Lenient mirror of the wire contract: every top-level field optional,
/// decoded one field at a time so a single bad field cannot sink the rest.
#[derive(Debug, Clone, Default)]
pub struct LlmOfferStrategies {
    pub primary_strategy: Option<LlmOfferStrategy>,
    pub alternative_strategies: Option<Vec<LlmOfferStrategy>>,
    pub market_summary: Option<String>,
    pub competitive_analysis: Option<String>,
    pub recommended_approach: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmOfferStrategy {
    pub recommended_offer: f64,
    #[serde(default)]
    pub offer_percentage: Option<f64>,
    pub confidence: f64,
    #[serde(default)]
    pub strategy: Option<StrategyKind>,
    pub reasoning: String,
    pub terms: LlmContractTerms,
    #[serde(default)]
    pub negotiation_tips: Vec<String>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    pub timeline: LlmOfferTimeline,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmContractTerms {
    pub inspection_period: u32,
    pub financing_contingency: u32,
    #[serde(default = "default_true")]
    pub appraisal_contingency: bool,
    #[serde(default)]
    pub escalation_clause: Option<EscalationClause>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmOfferTimeline {
    pub response_deadline: String,
    pub close_date: String,
    #[serde(default)]
    pub key_milestones: Vec<Milestone>,
}

/// What survived validation. The service backfills whatever is `None`
/// from the rule-based generators.
#[derive(Debug, Clone, Default)]
pub struct PartialStrategies {
    pub primary: Option<OfferStrategy>,
    pub alternatives: Option<Vec<OfferStrategy>>,
    pub market_summary: Option<String>,
    pub competitive_analysis: Option<String>,
    pub recommended_approach: Option<String>,
}

impl LlmOfferStrategies {
    /// Field-by-field decode of the model's JSON object. A field that
    /// fails to deserialize is dropped with a warning instead of failing
    /// the whole response.
    pub fn from_value(value: Value) -> anyhow::Result<Self> {
        let obj = match value {
            Value::Object(obj) => obj,
            other => anyhow::bail!("backend response must be a JSON object (got {other})"),
        };

        Ok(Self {
            primary_strategy: lenient_field(&obj, "primaryStrategy"),
            alternative_strategies: lenient_field(&obj, "alternativeStrategies"),
            market_summary: lenient_field(&obj, "marketSummary"),
            competitive_analysis: lenient_field(&obj, "competitiveAnalysis"),
            recommended_approach: lenient_field(&obj, "recommendedApproach"),
        })
    }

    /// Validate whatever was supplied against the listing price. Invalid
    /// strategies are dropped; blank narrative strings count as missing.
    pub fn validate(self, listing_price: f64) -> PartialStrategies {
        let primary = self
            .primary_strategy
            .and_then(|s| checked_strategy(s, listing_price, "primaryStrategy"));

        let alternatives = self.alternative_strategies.and_then(|list| {
            let mut kept: Vec<OfferStrategy> = list
                .into_iter()
                .filter_map(|s| checked_strategy(s, listing_price, "alternativeStrategies"))
                .collect();
            kept.truncate(3);
            (!kept.is_empty()).then_some(kept)
        });

        PartialStrategies {
            primary,
            alternatives,
            market_summary: non_blank(self.market_summary),
            competitive_analysis: non_blank(self.competitive_analysis),
            recommended_approach: non_blank(self.recommended_approach),
        }
    }
}

impl LlmOfferStrategy {
    /// Into a domain strategy, enforcing the invariants the engine
    /// guarantees on its own output: positive offer, percentage derived
    /// from the listing price, confidence inside [20, 95].
    pub fn validate_into_strategy(self, listing_price: f64) -> anyhow::Result<OfferStrategy> {
        anyhow::ensure!(
            self.recommended_offer.is_finite() && self.recommended_offer > 0.0,
            "recommended offer must be positive (got {})",
            self.recommended_offer
        );
        anyhow::ensure!(
            self.confidence.is_finite(),
            "confidence must be a number (got {})",
            self.confidence
        );

        let ratio = self.recommended_offer / listing_price;
        // The model's own percentage is advisory; the stored one is derived.
        let offer_percentage = ratio * 100.0;
        let strategy = self
            .strategy
            .unwrap_or_else(|| StrategyKind::from_offer_ratio(ratio));

        let confidence = (self.confidence.round() as i64)
            .clamp(i64::from(MIN_CONFIDENCE), i64::from(MAX_CONFIDENCE))
            as i32;

        let reasoning = self.reasoning.trim().to_string();
        anyhow::ensure!(!reasoning.is_empty(), "reasoning must be non-empty");

        let response_deadline = self.timeline.response_deadline.trim().to_string();
        let close_date = self.timeline.close_date.trim().to_string();
        anyhow::ensure!(
            !response_deadline.is_empty() && !close_date.is_empty(),
            "timeline must name a response deadline and a close date"
        );

        Ok(OfferStrategy {
            recommended_offer: self.recommended_offer,
            offer_percentage,
            confidence,
            strategy,
            reasoning,
            terms: ContractTerms {
                inspection_period: self.terms.inspection_period,
                financing_contingency: self.terms.financing_contingency,
                appraisal_contingency: self.terms.appraisal_contingency,
                escalation_clause: self.terms.escalation_clause,
            },
            negotiation_tips: self.negotiation_tips,
            risk_factors: self.risk_factors,
            strengths: self.strengths,
            timeline: OfferTimeline {
                response_deadline,
                close_date,
                key_milestones: self.timeline.key_milestones,
            },
        })
    }
}

fn lenient_field<T: DeserializeOwned>(
    obj: &serde_json::Map<String, Value>,
    key: &str,
) -> Option<T> {
    let value = obj.get(key)?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            tracing::warn!(key, error = %err, "dropping malformed field from backend response");
            None
        }
    }
}

fn checked_strategy(
    strategy: LlmOfferStrategy,
    listing_price: f64,
    key: &str,
) -> Option<OfferStrategy> {
    match strategy.validate_into_strategy(listing_price) {
        Ok(validated) => Some(validated),
        Err(err) => {
            tracing::warn!(key, error = %err, "dropping invalid strategy from backend response");
            None
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
