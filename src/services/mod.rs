pub mod feed;

pub use feed::{spawn_feed, FeedError, MarketDataProvider, SyntheticProvider};
