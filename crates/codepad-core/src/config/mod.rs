//! Configuration system
//!
//! A YAML file describes the server, the generative-language service and the
//! judge service; credentials and the listening port come from the
//! environment.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::*;
