use std::sync::Arc;

use application::EngagementService;
use domain::TokenCodec;

#[derive(Clone)]
pub struct AppState {
    pub codec: Arc<TokenCodec>,
    pub engagement: Arc<EngagementService>,
}

impl AppState {
    pub fn new(codec: Arc<TokenCodec>, engagement: Arc<EngagementService>) -> Self {
        Self { codec, engagement }
    }
}
