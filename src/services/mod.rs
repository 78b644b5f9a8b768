pub mod gemini;
pub mod knowledge;
pub mod language;
pub mod rate_limit;
