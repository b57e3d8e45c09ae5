mod gemini;
mod report;
mod summarizer;

pub use gemini::GeminiClient;
pub use report::ReportGenerator;
pub use summarizer::Summarizer;
