use chrono::{DateTime, Utc};

/// Sentiment classification bands for a [0, 100] index score.
///
/// Bands are lower-inclusive, so every threshold score (25, 45, 55, 75)
/// belongs to exactly one band; 100 stays in Extreme Greed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentBand {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
}

impl SentimentBand {
    pub const ALL: [SentimentBand; 5] = [
        SentimentBand::ExtremeFear,
        SentimentBand::Fear,
        SentimentBand::Neutral,
        SentimentBand::Greed,
        SentimentBand::ExtremeGreed,
    ];

    pub fn from_score(score: f64) -> Self {
        if score < 25.0 {
            SentimentBand::ExtremeFear
        } else if score < 45.0 {
            SentimentBand::Fear
        } else if score < 55.0 {
            SentimentBand::Neutral
        } else if score < 75.0 {
            SentimentBand::Greed
        } else {
            SentimentBand::ExtremeGreed
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentBand::ExtremeFear => "Extreme Fear",
            SentimentBand::Fear => "Fear",
            SentimentBand::Neutral => "Neutral",
            SentimentBand::Greed => "Greed",
            SentimentBand::ExtremeGreed => "Extreme Greed",
        }
    }

    /// Score range covered by this band, used for the shaded chart zones.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            SentimentBand::ExtremeFear => (0.0, 25.0),
            SentimentBand::Fear => (25.0, 45.0),
            SentimentBand::Neutral => (45.0, 55.0),
            SentimentBand::Greed => (55.0, 75.0),
            SentimentBand::ExtremeGreed => (75.0, 100.0),
        }
    }
}

/// Single point of a time series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Current index value with its derived sentiment classification.
#[derive(Debug, Clone)]
pub struct IndexReading {
    pub timestamp: DateTime<Utc>,
    pub score: f64,
    pub band: SentimentBand,
    /// Raw rating string as reported upstream (e.g. "extreme_greed")
    pub rating: String,
}

impl IndexReading {
    pub fn new(timestamp: DateTime<Utc>, score: f64, rating: String) -> Self {
        Self {
            timestamp,
            score,
            band: SentimentBand::from_score(score),
            rating,
        }
    }

    /// Upstream rating formatted for display ("extreme_greed" -> "Extreme Greed").
    pub fn rating_label(&self) -> String {
        humanize_rating(&self.rating)
    }
}

/// Current reading plus its trailing history, as returned by one fetch.
#[derive(Debug, Clone)]
pub struct IndexSnapshot {
    pub current: IndexReading,
    pub history: Vec<SeriesPoint>,
}

/// Title-case an upstream rating string, splitting on underscores.
pub fn humanize_rating(raw: &str) -> String {
    raw.split(|c| c == '_' || c == ' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
