//! char-markov: fixed-order character-level Markov text generation.
//!
//! Learns which characters follow each window of `n` characters in a
//! corpus, then walks those statistics with weighted random sampling to
//! extend a seed text.

pub mod core;
