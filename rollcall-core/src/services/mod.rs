pub mod mention_service;

pub use mention_service::{MentionService, PreparedBatches};
