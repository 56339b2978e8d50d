use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Condition tiers as captured on the property intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyCondition {
    Excellent,
    Good,
    Fair,
    NeedsWork,
    FixerUpper,
}

impl PropertyCondition {
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::NeedsWork => "needs work",
            Self::FixerUpper => "fixer-upper",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SellerMotivation {
    ExtremelyMotivated,
    Motivated,
    SomewhatMotivated,
    NotMotivated,
    TestingMarket,
}

impl SellerMotivation {
    pub fn label(self) -> &'static str {
        match self {
            Self::ExtremelyMotivated => "extremely motivated",
            Self::Motivated => "motivated",
            Self::SomewhatMotivated => "somewhat motivated",
            Self::NotMotivated => "not motivated",
            Self::TestingMarket => "testing the market",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonForSelling {
    Relocation,
    Divorce,
    FinancialHardship,
    Downsizing,
    Upsizing,
    EstateSale,
    InvestmentExit,
    Retirement,
    Other,
}

impl ReasonForSelling {
    pub fn label(self) -> &'static str {
        match self {
            Self::Relocation => "relocation",
            Self::Divorce => "divorce",
            Self::FinancialHardship => "financial hardship",
            Self::Downsizing => "downsizing",
            Self::Upsizing => "upsizing",
            Self::EstateSale => "estate sale",
            Self::InvestmentExit => "investment exit",
            Self::Retirement => "retirement",
            Self::Other => "other",
        }
    }
}

/// Close-timeline buckets shared by the seller and buyer sides of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "asap")]
    Asap,
    #[serde(rename = "30_days")]
    Days30,
    #[serde(rename = "60_days")]
    Days60,
    #[serde(rename = "90_days")]
    Days90,
    #[serde(rename = "flexible")]
    Flexible,
    #[serde(rename = "no_rush")]
    NoRush,
}

impl Timeframe {
    pub fn label(self) -> &'static str {
        match self {
            Self::Asap => "as soon as possible",
            Self::Days30 => "within 30 days",
            Self::Days60 => "within 60 days",
            Self::Days90 => "within 90 days",
            Self::Flexible => "flexible",
            Self::NoRush => "no rush",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionLevel {
    High,
    Medium,
    Low,
}

impl CompetitionLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalTiming {
    Peak,
    Good,
    Average,
    Slow,
}

impl SeasonalTiming {
    pub fn label(self) -> &'static str {
        match self {
            Self::Peak => "peak",
            Self::Good => "good",
            Self::Average => "average",
            Self::Slow => "slow",
        }
    }
}

/// Area snapshot supplied by the upstream market-lookup feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    pub location: String,
    pub property_type: String,
    /// Average days on market across recent area sales.
    pub days_on_market: u32,
    /// Year-over-year price change, percent.
    pub price_change: f64,
    /// Months of inventory at the current sales pace.
    pub inventory: f64,
    pub median_price: f64,
    pub sales_volume: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitive_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_sq_ft: Option<f64>,
}

/// Everything the engine knows about one property/seller/buyer situation.
/// Built per request by the caller and never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferFactors {
    pub listing_price: f64,
    /// Zero or absent means the engine picks the number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposed_offer: Option<f64>,
    pub property_condition: PropertyCondition,
    pub property_type: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_features: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repair_needs: Option<String>,
    pub seller_motivation: SellerMotivation,
    pub days_on_market: u32,
    pub price_reductions: u32,
    pub reason_for_selling: ReasonForSelling,
    pub seller_timeframe: Timeframe,
    pub buyer_timeframe: Timeframe,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_close_date: Option<NaiveDate>,
    pub market_data: MarketData,
    pub competition_level: CompetitionLevel,
    pub seasonal_timing: SeasonalTiming,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concessions: Option<String>,
}

impl OfferFactors {
    /// Boundary guard. The engine divides by the listing price, so a
    /// non-positive or non-finite value must never reach it.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.listing_price.is_finite() && self.listing_price > 0.0,
            "listing price must be a positive amount (got {})",
            self.listing_price
        );

        if let Some(offer) = self.proposed_offer {
            anyhow::ensure!(
                offer.is_finite() && offer >= 0.0,
                "proposed offer must be a non-negative amount (got {offer})"
            );
        }

        anyhow::ensure!(
            self.market_data.inventory.is_finite() && self.market_data.inventory >= 0.0,
            "market inventory must be a non-negative number of months (got {})",
            self.market_data.inventory
        );
        anyhow::ensure!(
            self.market_data.median_price.is_finite() && self.market_data.median_price >= 0.0,
            "median price must be a non-negative amount (got {})",
            self.market_data.median_price
        );
        anyhow::ensure!(
            self.market_data.price_change.is_finite(),
            "market price change must be a finite percentage (got {})",
            self.market_data.price_change
        );

        Ok(())
    }

    /// A proposed offer of zero is the intake form's way of saying
    /// "engine decides".
    pub fn buyer_proposed_offer(&self) -> Option<f64> {
        self.proposed_offer.filter(|offer| *offer > 0.0)
    }
}
