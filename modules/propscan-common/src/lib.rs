pub mod config;
pub mod error;
pub mod quality;
pub mod telemetry;
pub mod types;

pub use config::Config;
pub use error::PropscanError;
pub use quality::*;
pub use types::*;
