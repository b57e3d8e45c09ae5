mod transcript;
mod youtube;

pub use transcript::TranscriptFetcher;
pub use youtube::YouTubeClient;
