pub mod config;
pub mod frequency;
pub mod markov;

pub use config::{ConfigError, GeneratorConfig};
pub use frequency::{CharObservation, FrequencyTable};
pub use markov::{MarkovError, MarkovModel};
