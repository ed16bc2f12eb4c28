use plotters::style::RGBColor;

use super::index::SeriesPoint;

/// The seven sub-indicators that compose the Fear & Greed Index.
///
/// Keys and display titles follow the upstream graphdata document; each
/// component also carries a fixed chart color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    MarketMomentum,
    StockPriceStrength,
    StockPriceBreadth,
    PutCallOptions,
    MarketVolatility,
    JunkBondDemand,
    SafeHavenDemand,
}

impl Component {
    pub const ALL: [Component; 7] = [
        Component::MarketMomentum,
        Component::StockPriceStrength,
        Component::StockPriceBreadth,
        Component::PutCallOptions,
        Component::MarketVolatility,
        Component::JunkBondDemand,
        Component::SafeHavenDemand,
    ];

    /// Key of this component's series in the upstream JSON document.
    pub fn api_key(&self) -> &'static str {
        match self {
            Component::MarketMomentum => "market_momentum_sp500",
            Component::StockPriceStrength => "stock_price_strength",
            Component::StockPriceBreadth => "stock_price_breadth",
            Component::PutCallOptions => "put_call_options",
            Component::MarketVolatility => "market_volatility_vix",
            Component::JunkBondDemand => "junk_bond_demand",
            Component::SafeHavenDemand => "safe_haven_demand",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Component::MarketMomentum => "Market Momentum (S&P 500)",
            Component::StockPriceStrength => "Stock Price Strength",
            Component::StockPriceBreadth => "Stock Price Breadth",
            Component::PutCallOptions => "Put/Call Options",
            Component::MarketVolatility => "Market Volatility (VIX)",
            Component::JunkBondDemand => "Junk Bond Demand",
            Component::SafeHavenDemand => "Safe Haven Demand",
        }
    }

    pub fn color(&self) -> RGBColor {
        match self {
            Component::MarketMomentum => RGBColor(31, 119, 180),
            Component::StockPriceStrength => RGBColor(44, 160, 44),
            Component::StockPriceBreadth => RGBColor(214, 39, 40),
            Component::PutCallOptions => RGBColor(148, 103, 189),
            Component::MarketVolatility => RGBColor(140, 86, 75),
            Component::JunkBondDemand => RGBColor(127, 127, 127),
            Component::SafeHavenDemand => RGBColor(188, 189, 34),
        }
    }
}

/// One component's trailing history plus its current classification.
#[derive(Debug, Clone)]
pub struct ComponentSeries {
    pub component: Component,
    pub points: Vec<SeriesPoint>,
    pub score: f64,
    /// Raw rating string as reported upstream
    pub rating: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_keys_are_unique() {
        let mut keys: Vec<&str> = Component::ALL.iter().map(|c| c.api_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), Component::ALL.len());
    }
}
