//! Compiled artifact lookup
//!
//! Maps logical contract names onto the on-disk artifact layout and deploys
//! the parsed definitions into a simulator.

pub mod resolver;

pub use resolver::ContractResolver;
