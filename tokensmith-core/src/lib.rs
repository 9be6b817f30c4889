//! Build tooling for web-component design-system packages: entry-point
//! discovery feeding a bundler configuration, design-token stylesheet
//! generation, and a batch CSS processor.
//!
//! The three concerns are independent and never call into one another;
//! they share only the serialization helpers in [`output`] and the
//! trace sink in [`debug`].

pub mod css;
pub mod cssfmt;
pub mod debug;
pub mod entries;
pub mod output;
pub mod tokens;
pub mod typography;
