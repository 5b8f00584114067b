use coursemate_rag::RagSystem;

/// Application state shared across all request handlers.
///
/// `RagSystem` keeps per-question tool state inside each call, so one
/// instance serves every request concurrently.
pub struct AppState {
    pub rag: RagSystem,
}

impl AppState {
    pub fn new(rag: RagSystem) -> Self {
        Self { rag }
    }
}
