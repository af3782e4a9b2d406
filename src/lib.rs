pub mod cli;
pub mod config;
pub mod errors;
pub mod git;
pub mod replay;

pub use errors::ReplayError;
