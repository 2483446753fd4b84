pub mod helpers;
pub mod network_stats;
