use std::sync::Arc;

use crate::domain::ports::inbound::AvatarService;

#[derive(Clone)]
pub struct AppState {
    pub avatar_service: Arc<dyn AvatarService>,
}

impl AppState {
    pub fn new(avatar_service: Arc<dyn AvatarService>) -> Self {
        Self { avatar_service }
    }
}
