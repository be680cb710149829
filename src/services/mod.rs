pub mod match_service;
pub mod recommend_service;

pub use match_service::MatchService;
pub use recommend_service::{RecommendConfig, RecommendService};
