pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "lambda")]
pub use config::lambda::{LambdaConfig, SecretsManagerProvider};

pub use adapters::{mysql::MySqlConnector, sql_files::SqlFileSource};
pub use config::{cli::LocalSecretProvider, InitConfig};
pub use core::initializer::DatabaseInitializer;
pub use domain::model::{InitReport, InitResponse};
pub use utils::error::{InitError, Result};
