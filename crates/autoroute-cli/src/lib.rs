//! Autoroute CLI library.
//!
//! Holds the pieces of the command-line interface that are worth testing
//! without spawning the binary, currently the run summary formatting.

pub mod output;
