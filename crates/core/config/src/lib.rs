pub use config_loader::{LoadConfigError, load_from_file, load_from_file_sync, load_from_str};
pub use herald_config::{
    ConfigValidationError, DEFAULT_CONFIG_PATH, FeedConfig, FeedSelection, HeraldConfig, HeraldSettings, TwitterConfig,
};

mod config_loader;
mod herald_config;
