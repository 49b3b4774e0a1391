//! Herald: watches smoothing pool oracle feeds and announces new events.
//!
//! Re-exports the workspace crates behind per-group features.

#[cfg(feature = "broadcast")]
pub mod broadcast {
    #[cfg(feature = "broadcast-twitter")]
    pub use herald_broadcast_twitter as twitter;
}

#[cfg(feature = "core")]
pub mod core {
    #[cfg(feature = "core-config")]
    pub use herald_core_config as config;
    #[cfg(feature = "core-orchestrator")]
    pub use herald_core_orchestrator as orchestrator;
}

#[cfg(feature = "render")]
pub mod render {
    #[cfg(feature = "render-message")]
    pub use herald_render_message as message;
}

#[cfg(feature = "source")]
pub mod source {
    #[cfg(feature = "source-oracle")]
    pub use herald_source_oracle as oracle;
}

#[cfg(feature = "storage")]
pub mod storage {
    #[cfg(feature = "storage-ledger")]
    pub use herald_storage_ledger as ledger;
}

#[cfg(feature = "types")]
pub mod types {
    #[cfg(feature = "types-events")]
    pub use herald_types_events as events;
}
