pub mod loader;
pub mod schema;

pub use loader::{load_from_path, load_from_str, locate, ConfigError, CONFIG_ENV, CONFIG_FILE_NAME};
pub use schema::{Settings, ValidationError, ValidationIssue};
