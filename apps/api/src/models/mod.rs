pub mod posting;

pub use posting::{JobPosting, MatchResult, PostingError};
