pub mod config;
pub mod logging;

pub mod checksum;
pub mod fetch;
pub mod pool;
pub mod stats;
