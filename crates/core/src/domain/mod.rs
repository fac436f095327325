pub mod analysis;
pub mod defaults;

pub use analysis::{DailyAnalysis, NewsItem, Outlook, SectorOrTheme, StockRecommendation};
