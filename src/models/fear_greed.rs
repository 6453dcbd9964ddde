use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Textual sentiment rating attached to every indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "extreme fear")]
    ExtremeFear,
    #[serde(rename = "fear")]
    Fear,
    #[serde(rename = "neutral")]
    Neutral,
    #[serde(rename = "greed")]
    Greed,
    #[serde(rename = "extreme greed")]
    ExtremeGreed,
}

impl Rating {
    pub const ALL: [Rating; 5] = [
        Rating::ExtremeFear,
        Rating::Fear,
        Rating::Neutral,
        Rating::Greed,
        Rating::ExtremeGreed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::ExtremeFear => "extreme fear",
            Rating::Fear => "fear",
            Rating::Neutral => "neutral",
            Rating::Greed => "greed",
            Rating::ExtremeGreed => "extreme greed",
        }
    }

    /// Band a score falls into: [0,25] extreme fear, (25,45] fear,
    /// (45,55] neutral, (55,75] greed, (75,100] extreme greed.
    /// Returns None for scores outside [0,100]
    pub fn for_score(score: f64) -> Option<Rating> {
        match score {
            s if !(0.0..=100.0).contains(&s) => None,
            s if s <= 25.0 => Some(Rating::ExtremeFear),
            s if s <= 45.0 => Some(Rating::Fear),
            s if s <= 55.0 => Some(Rating::Neutral),
            s if s <= 75.0 => Some(Rating::Greed),
            _ => Some(Rating::ExtremeGreed),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single sub-indicator reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    pub timestamp: String,
    pub score: f64,
    pub rating: Rating,
}

/// The composite index, carrying its own history for comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeIndicator {
    pub timestamp: String,
    pub score: f64,
    pub rating: Rating,
    pub previous_close: f64,
    pub previous_1_week: f64,
    pub previous_1_month: f64,
    pub previous_1_year: f64,
}

impl CompositeIndicator {
    pub fn record(&self) -> IndicatorRecord {
        IndicatorRecord {
            timestamp: self.timestamp.clone(),
            score: self.score,
            rating: self.rating,
        }
    }
}

/// Full validated response. Field order is the serialization order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub fear_and_greed: CompositeIndicator,
    pub fear_and_greed_historical: IndicatorRecord,
    pub market_momentum_sp500: IndicatorRecord,
    pub market_momentum_sp125: IndicatorRecord,
    pub stock_price_strength: IndicatorRecord,
    pub stock_price_breadth: IndicatorRecord,
    pub put_call_options: IndicatorRecord,
    pub market_volatility_vix: IndicatorRecord,
    pub market_volatility_vix_50: IndicatorRecord,
    pub junk_bond_demand: IndicatorRecord,
    pub safe_haven_demand: IndicatorRecord,
}

impl IndexSnapshot {
    /// Every slot as a plain record, in slot order
    pub fn records(&self) -> Vec<(Slot, IndicatorRecord)> {
        vec![
            (Slot::FearAndGreed, self.fear_and_greed.record()),
            (Slot::FearAndGreedHistorical, self.fear_and_greed_historical.clone()),
            (Slot::MarketMomentumSp500, self.market_momentum_sp500.clone()),
            (Slot::MarketMomentumSp125, self.market_momentum_sp125.clone()),
            (Slot::StockPriceStrength, self.stock_price_strength.clone()),
            (Slot::StockPriceBreadth, self.stock_price_breadth.clone()),
            (Slot::PutCallOptions, self.put_call_options.clone()),
            (Slot::MarketVolatilityVix, self.market_volatility_vix.clone()),
            (Slot::MarketVolatilityVix50, self.market_volatility_vix_50.clone()),
            (Slot::JunkBondDemand, self.junk_bond_demand.clone()),
            (Slot::SafeHavenDemand, self.safe_haven_demand.clone()),
        ]
    }

    /// Slots whose score is outside [0,100] or whose rating disagrees with
    /// the score band. Advisory only: the provider's rating is kept as-is.
    pub fn inconsistencies(&self) -> Vec<(Slot, IndicatorRecord)> {
        self.records()
            .into_iter()
            .filter(|(_, record)| Rating::for_score(record.score) != Some(record.rating))
            .collect()
    }
}

/// The eleven named positions of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    FearAndGreed,
    FearAndGreedHistorical,
    MarketMomentumSp500,
    MarketMomentumSp125,
    StockPriceStrength,
    StockPriceBreadth,
    PutCallOptions,
    MarketVolatilityVix,
    MarketVolatilityVix50,
    JunkBondDemand,
    SafeHavenDemand,
}

impl Slot {
    pub const ALL: [Slot; 11] = [
        Slot::FearAndGreed,
        Slot::FearAndGreedHistorical,
        Slot::MarketMomentumSp500,
        Slot::MarketMomentumSp125,
        Slot::StockPriceStrength,
        Slot::StockPriceBreadth,
        Slot::PutCallOptions,
        Slot::MarketVolatilityVix,
        Slot::MarketVolatilityVix50,
        Slot::JunkBondDemand,
        Slot::SafeHavenDemand,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Slot::FearAndGreed => "fear_and_greed",
            Slot::FearAndGreedHistorical => "fear_and_greed_historical",
            Slot::MarketMomentumSp500 => "market_momentum_sp500",
            Slot::MarketMomentumSp125 => "market_momentum_sp125",
            Slot::StockPriceStrength => "stock_price_strength",
            Slot::StockPriceBreadth => "stock_price_breadth",
            Slot::PutCallOptions => "put_call_options",
            Slot::MarketVolatilityVix => "market_volatility_vix",
            Slot::MarketVolatilityVix50 => "market_volatility_vix_50",
            Slot::JunkBondDemand => "junk_bond_demand",
            Slot::SafeHavenDemand => "safe_haven_demand",
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Slot::FearAndGreed)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Slot::FearAndGreed => "Main composite Fear & Greed Index with historical comparisons",
            Slot::FearAndGreedHistorical => "Historical Fear & Greed Index data",
            Slot::MarketMomentumSp500 => {
                "S&P 500 momentum indicator - measures stock prices vs 125-day moving average"
            }
            Slot::MarketMomentumSp125 => "S&P 500 125-day moving average momentum",
            Slot::StockPriceStrength => "Stock price strength - ratio of NYSE 52-week highs vs lows",
            Slot::StockPriceBreadth => "Stock price breadth - McClellan Volume Summation Index",
            Slot::PutCallOptions => {
                "Put/Call options ratio - 5-day average (higher ratio indicates fear)"
            }
            Slot::MarketVolatilityVix => {
                "Market volatility - VIX fear index (higher values indicate fear)"
            }
            Slot::MarketVolatilityVix50 => "VIX 50-day moving average volatility",
            Slot::JunkBondDemand => {
                "Junk bond demand - yield spread between junk and investment-grade bonds"
            }
            Slot::SafeHavenDemand => {
                "Safe haven demand - difference between 20-day stock and bond returns"
            }
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Provider payload after normalization but before schema checks.
/// Keys are the provider's top-level keys; values are slot objects with
/// `data` removed and numeric timestamps rendered as ISO-8601 strings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedPayload {
    slots: Map<String, Value>,
}

impl NormalizedPayload {
    pub fn new(slots: Map<String, Value>) -> Self {
        Self { slots }
    }

    pub fn get(&self, slot: &str) -> Option<&Value> {
        self.slots.get(slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
