pub mod config;
pub mod logging;

pub mod asset_name;
pub mod bundle_cache;
pub mod catalog;
pub mod descriptions;
pub mod github;
pub mod harvest;
pub mod pipeline;
pub mod records;
pub mod resolver;
