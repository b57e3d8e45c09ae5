mod fetcher;

pub use fetcher::ChannelFeedFetcher;
