// Adapters layer: concrete implementations for external systems (database, bundled files).
// The Secrets Manager client lives with the Lambda configuration under config::lambda.

pub mod mysql;
pub mod sql_files;
