pub mod alternatives;
pub mod confidence;
pub mod narrative;
pub mod primary;

use std::sync::Arc;

use anyhow::Context;

use crate::config::Settings;
use crate::domain::contract::{LlmOfferStrategies, PartialStrategies};
use crate::domain::factors::OfferFactors;
use crate::domain::strategy::OfferStrategies;
use crate::llm::anthropic::AnthropicClient;
use crate::llm::{prompt, ReasoningBackend};

/// The one entry point. Stateless: holds nothing but the optional
/// reasoning backend, so any number of calls can run concurrently.
pub struct OfferStrategyService {
    backend: Option<Arc<dyn ReasoningBackend>>,
}

impl OfferStrategyService {
    pub fn new(backend: Option<Arc<dyn ReasoningBackend>>) -> Self {
        Self { backend }
    }

    /// Rule-based only; never touches the network.
    pub fn deterministic() -> Self {
        Self::new(None)
    }

    /// Backend iff an Anthropic key is configured. A client that fails to
    /// construct downgrades to the rule-based path instead of failing
    /// startup.
    pub fn from_settings(settings: &Settings) -> Self {
        if settings.anthropic_api_key.is_none() {
            tracing::debug!("no reasoning backend configured; strategies are rule-based");
            return Self::deterministic();
        }
        match AnthropicClient::from_settings(settings) {
            Ok(client) => Self::new(Some(Arc::new(client))),
            Err(err) => {
                tracing::warn!(error = %err, "reasoning backend unavailable; strategies are rule-based");
                Self::deterministic()
            }
        }
    }

    /// Errors only when the factors themselves are unusable. Once past
    /// validation the call always returns a complete answer; backend
    /// trouble degrades to the rule-based strategies.
    pub async fn generate_offer_strategies(
        &self,
        factors: &OfferFactors,
    ) -> anyhow::Result<OfferStrategies> {
        factors.validate()?;

        if let Some(backend) = &self.backend {
            match generate_via_backend(backend.as_ref(), factors).await {
                Ok(strategies) => return Ok(strategies),
                Err(err) => {
                    tracing::warn!(
                        provider = ?backend.provider(),
                        error = format!("{err:#}"),
                        "reasoning backend failed; using rule-based strategies"
                    );
                }
            }
        }

        Ok(deterministic_strategies(factors))
    }
}

async fn generate_via_backend(
    backend: &dyn ReasoningBackend,
    factors: &OfferFactors,
) -> anyhow::Result<OfferStrategies> {
    let prompt = prompt::build_prompt(factors);
    let raw = backend.complete(&prompt).await?;
    let decoded = LlmOfferStrategies::from_value(raw)
        .context("backend response does not fit the strategies contract")?;
    Ok(merge(decoded.validate(factors.listing_price), factors))
}

/// The fully rule-based answer: primary, bracketing alternatives, and
/// the three market narrative strings.
pub fn deterministic_strategies(factors: &OfferFactors) -> OfferStrategies {
    let primary_strategy = primary::primary_strategy(factors);
    let alternative_strategies = alternatives::alternative_strategies(&primary_strategy, factors);
    OfferStrategies {
        primary_strategy,
        alternative_strategies,
        market_summary: narrative::market_summary(factors),
        competitive_analysis: narrative::competitive_analysis(factors),
        recommended_approach: narrative::recommended_approach(factors),
    }
}

/// Field-by-field backfill: whatever the model supplied and validation
/// kept is used; everything else is computed here, only when needed.
fn merge(partial: PartialStrategies, factors: &OfferFactors) -> OfferStrategies {
    let primary_strategy = partial
        .primary
        .unwrap_or_else(|| primary::primary_strategy(factors));
    let alternative_strategies = partial
        .alternatives
        .unwrap_or_else(|| alternatives::alternative_strategies(&primary_strategy, factors));
    OfferStrategies {
        market_summary: partial
            .market_summary
            .unwrap_or_else(|| narrative::market_summary(factors)),
        competitive_analysis: partial
            .competitive_analysis
            .unwrap_or_else(|| narrative::competitive_analysis(factors)),
        recommended_approach: partial
            .recommended_approach
            .unwrap_or_else(|| narrative::recommended_approach(factors)),
        primary_strategy,
        alternative_strategies,
    }
}

/// "$425,000"-style figure for narrative text.
pub(crate) fn fmt_usd(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if whole < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::factors::{PropertyCondition, SellerMotivation};
    use crate::llm::{Provider, StrategyPrompt};
    use crate::test_fixtures::baseline_factors;
    use serde_json::json;

    struct FailingBackend;

    #[async_trait::async_trait]
    impl ReasoningBackend for FailingBackend {
        fn provider(&self) -> Provider {
            Provider::Anthropic
        }

        async fn complete(&self, _prompt: &StrategyPrompt) -> anyhow::Result<serde_json::Value> {
            anyhow::bail!("rate limited")
        }
    }

    struct CannedBackend(serde_json::Value);

    #[async_trait::async_trait]
    impl ReasoningBackend for CannedBackend {
        fn provider(&self) -> Provider {
            Provider::Anthropic
        }

        async fn complete(&self, _prompt: &StrategyPrompt) -> anyhow::Result<serde_json::Value> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn no_backend_path_is_deterministic() {
        let factors = baseline_factors();
        let service = OfferStrategyService::deterministic();
        let first = service.generate_offer_strategies(&factors).await.unwrap();
        let second = service.generate_offer_strategies(&factors).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn backend_failure_falls_back_to_rules() {
        let factors = baseline_factors();
        let service = OfferStrategyService::new(Some(Arc::new(FailingBackend)));
        let got = service.generate_offer_strategies(&factors).await.unwrap();
        assert_eq!(got, deterministic_strategies(&factors));
    }

    #[tokio::test]
    async fn junk_backend_output_falls_back_to_rules() {
        // The model answered with prose instead of an object.
        let factors = baseline_factors();
        let service =
            OfferStrategyService::new(Some(Arc::new(CannedBackend(json!("no JSON here")))));
        let got = service.generate_offer_strategies(&factors).await.unwrap();

        assert_eq!(got, deterministic_strategies(&factors));
        assert!(!got.market_summary.is_empty());
        assert!(!got.competitive_analysis.is_empty());
        assert!(!got.recommended_approach.is_empty());
    }

    #[tokio::test]
    async fn partial_backend_output_is_backfilled() {
        let factors = baseline_factors();
        let canned = json!({
            "marketSummary": "Model-written summary.",
            "recommendedApproach": "Model-written approach.",
        });
        let service = OfferStrategyService::new(Some(Arc::new(CannedBackend(canned))));
        let got = service.generate_offer_strategies(&factors).await.unwrap();

        assert_eq!(got.market_summary, "Model-written summary.");
        assert_eq!(got.recommended_approach, "Model-written approach.");

        // Everything the model skipped comes from the rules.
        let rules = deterministic_strategies(&factors);
        assert_eq!(got.primary_strategy, rules.primary_strategy);
        assert_eq!(got.alternative_strategies, rules.alternative_strategies);
        assert_eq!(got.competitive_analysis, rules.competitive_analysis);
    }

    #[tokio::test]
    async fn invalid_listing_price_is_rejected() {
        let mut factors = baseline_factors();
        factors.listing_price = 0.0;
        let service = OfferStrategyService::deterministic();
        assert!(service.generate_offer_strategies(&factors).await.is_err());
    }

    #[test]
    fn invariants_hold_across_a_factor_spread() {
        let mut variants = Vec::new();
        for motivation in [
            SellerMotivation::ExtremelyMotivated,
            SellerMotivation::NotMotivated,
            SellerMotivation::TestingMarket,
        ] {
            for condition in [PropertyCondition::Excellent, PropertyCondition::FixerUpper] {
                for days_on_market in [5, 45, 95] {
                    let mut factors = baseline_factors();
                    factors.seller_motivation = motivation;
                    factors.property_condition = condition;
                    factors.days_on_market = days_on_market;
                    factors.price_reductions = days_on_market / 40;
                    variants.push(factors);
                }
            }
        }

        for factors in &variants {
            let got = deterministic_strategies(factors);
            let all =
                std::iter::once(&got.primary_strategy).chain(got.alternative_strategies.iter());
            for strategy in all {
                let derived = strategy.recommended_offer / factors.listing_price * 100.0;
                assert!((strategy.offer_percentage - derived).abs() < 1e-9);
                assert!((20..=95).contains(&strategy.confidence));
                assert!(!strategy.reasoning.is_empty());
                assert!(!strategy.negotiation_tips.is_empty());
                assert!(!strategy.risk_factors.is_empty());
                assert!(!strategy.strengths.is_empty());
            }
            assert!((1..=3).contains(&got.alternative_strategies.len()));
            assert!(
                got.alternative_strategies[0].recommended_offer
                    > got.primary_strategy.recommended_offer
            );
            assert!(
                got.alternative_strategies[1].recommended_offer
                    < got.primary_strategy.recommended_offer
            );
        }
    }

    #[test]
    fn fmt_usd_groups_thousands() {
        assert_eq!(fmt_usd(425_000.0), "$425,000");
        assert_eq!(fmt_usd(1_250_000.0), "$1,250,000");
        assert_eq!(fmt_usd(950.0), "$950");
        assert_eq!(fmt_usd(-12_500.0), "-$12,500");
    }
}
