pub use feed::Feed;
pub use orchestrator::{CycleOrchestrator, OrchestratorSettings, TickReport};

mod feed;
mod orchestrator;
