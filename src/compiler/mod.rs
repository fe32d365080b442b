pub mod loader;
pub mod resolver;
pub mod synthesizer;
pub mod trigger;
