pub mod domain;
pub mod engine;
pub mod llm;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub anthropic_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_anthropic_api_key(&self) -> anyhow::Result<&str> {
            self.anthropic_api_key
                .as_deref()
                .context("ANTHROPIC_API_KEY is required")
        }
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use crate::domain::factors::{
        CompetitionLevel, MarketData, OfferFactors, PropertyCondition, ReasonForSelling,
        SeasonalTiming, SellerMotivation, Timeframe,
    };

    /// A mid-market listing with no strong signal in any direction.
    pub(crate) fn baseline_factors() -> OfferFactors {
        OfferFactors {
            listing_price: 400_000.0,
            proposed_offer: None,
            property_condition: PropertyCondition::Good,
            property_type: "single_family".to_string(),
            location: "Maple Grove, MN".to_string(),
            unique_features: None,
            repair_needs: None,
            seller_motivation: SellerMotivation::SomewhatMotivated,
            days_on_market: 25,
            price_reductions: 0,
            reason_for_selling: ReasonForSelling::Relocation,
            seller_timeframe: Timeframe::Days60,
            buyer_timeframe: Timeframe::Days30,
            desired_close_date: None,
            market_data: MarketData {
                location: "Maple Grove, MN".to_string(),
                property_type: "single_family".to_string(),
                days_on_market: 32,
                price_change: 2.4,
                inventory: 3.8,
                median_price: 415_000.0,
                sales_volume: 118,
                competitive_score: Some(6.5),
                price_per_sq_ft: Some(231.0),
            },
            competition_level: CompetitionLevel::Medium,
            seasonal_timing: SeasonalTiming::Average,
            concessions: None,
        }
    }
}
