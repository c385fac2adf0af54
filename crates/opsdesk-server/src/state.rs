use std::path::PathBuf;
use tokio::sync::broadcast;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub event_tx: broadcast::Sender<()>,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            root,
            event_tx: tx,
        }
    }

    /// Broadcast a change tick to SSE subscribers. Handlers call this after
    /// every successful mutation; a lagging or absent subscriber is fine.
    pub fn touch(&self) {
        let _ = self.event_tx.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_stores_root() {
        let state = AppState::new(std::path::PathBuf::from("/tmp/test"));
        assert_eq!(state.root, std::path::PathBuf::from("/tmp/test"));
    }

    #[test]
    fn touch_without_subscribers_is_fine() {
        let state = AppState::new(std::path::PathBuf::from("/tmp/test"));
        state.touch();
    }
}
