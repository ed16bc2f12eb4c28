use serde::Deserialize;
use serde_json::Value;

use crate::models::Component;

/// Top-level shape of the graphdata document.
///
/// Every field is optional so that a missing key surfaces as a precise
/// `MalformedResponse` during parsing instead of an opaque serde error.
#[derive(Debug, Deserialize)]
pub struct GraphData {
    pub fear_and_greed: Option<CurrentIndex>,
    pub fear_and_greed_historical: Option<SeriesData>,
    pub market_momentum_sp500: Option<SeriesData>,
    pub stock_price_strength: Option<SeriesData>,
    pub stock_price_breadth: Option<SeriesData>,
    pub put_call_options: Option<SeriesData>,
    pub market_volatility_vix: Option<SeriesData>,
    pub junk_bond_demand: Option<SeriesData>,
    pub safe_haven_demand: Option<SeriesData>,
}

impl GraphData {
    pub fn component_series(&self, component: Component) -> Option<&SeriesData> {
        match component {
            Component::MarketMomentum => self.market_momentum_sp500.as_ref(),
            Component::StockPriceStrength => self.stock_price_strength.as_ref(),
            Component::StockPriceBreadth => self.stock_price_breadth.as_ref(),
            Component::PutCallOptions => self.put_call_options.as_ref(),
            Component::MarketVolatility => self.market_volatility_vix.as_ref(),
            Component::JunkBondDemand => self.junk_bond_demand.as_ref(),
            Component::SafeHavenDemand => self.safe_haven_demand.as_ref(),
        }
    }
}

/// Current aggregate index block.
#[derive(Debug, Deserialize)]
pub struct CurrentIndex {
    pub score: Option<f64>,
    pub rating: Option<String>,
}

/// Historical block: a current score/rating plus a point list.
#[derive(Debug, Deserialize)]
pub struct SeriesData {
    pub score: Option<f64>,
    pub rating: Option<String>,
    pub data: Option<Vec<RawPoint>>,
}

/// One raw (x, y) point; x is epoch milliseconds, y may be non-numeric
/// for some components and is filtered during parsing.
#[derive(Debug, Deserialize)]
pub struct RawPoint {
    pub x: Option<f64>,
    pub y: Option<Value>,
}
