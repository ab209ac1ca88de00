// Matching and ranking engine. Synchronous; the only I/O is reading a resume file.

pub mod recency;
pub mod resume;
pub mod similarity;
pub mod vectorizer;
