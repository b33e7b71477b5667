pub mod error;
pub mod logger;
pub mod timing;
pub mod validation;
