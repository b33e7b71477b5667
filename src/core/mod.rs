pub mod batch;
pub mod initializer;

pub use crate::domain::model::{DbCredentials, InitReport, InitResponse, SqlBatch};
pub use crate::domain::ports::{ConfigProvider, Connector, SecretProvider, SqlSession, SqlSource};
pub use crate::utils::error::Result;
