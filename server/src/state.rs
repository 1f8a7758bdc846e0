use std::sync::Arc;

use todo_core::TodoRepository;

/// Shared handler state. Cloning is cheap; every clone shares one storage
/// handle.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn TodoRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn TodoRepository>) -> Self {
        Self { repository }
    }
}
