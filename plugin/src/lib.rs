pub mod config;
pub mod error;
pub mod host;
pub mod menu;
pub mod model;
pub mod navigation;
pub mod orchestrator;
pub mod permissions;
pub mod roster;
pub mod store;
pub mod template;

#[cfg(test)]
mod test_support;
