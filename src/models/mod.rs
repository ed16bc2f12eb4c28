//! Domain types shared across the fetch, render and dispatch stages.

pub mod component;
pub mod index;

pub use component::{Component, ComponentSeries};
pub use index::{humanize_rating, IndexReading, IndexSnapshot, SentimentBand, SeriesPoint};
