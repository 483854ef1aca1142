pub mod action;
pub mod config;
pub mod determinize;
pub mod engine;
pub mod env;
pub mod error;
pub mod key;
pub mod policy;
pub mod snapshot;
pub mod store;

#[cfg(test)]
mod tests;
