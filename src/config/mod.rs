pub mod contexts;
pub mod error;
pub mod paths;
pub mod settings;

pub use contexts::{context_name, validate_context_part, Contexts};
pub use error::ConfigError;
pub use paths::{
    default_config_path, StatePaths, CONFIG_FILE_NAME, CONTEXTS_DIR_NAME, GLOBAL_STATE_DIR,
};
pub use settings::{CloudConfig, InternalIds, ResolutionMode, ENV_API_KEY, ENV_API_URL};
