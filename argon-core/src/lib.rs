pub mod config;
pub mod convert;
pub mod dispatch;
pub mod paths;
pub mod plan;
pub mod resolution;
pub mod tools;
pub mod validate;
