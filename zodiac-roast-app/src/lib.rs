pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

mod app_context;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use app_context::{image_provider, text_generator, AppContext, Services};
pub use config::{AiConfig, AppConfig, ConfigError};
