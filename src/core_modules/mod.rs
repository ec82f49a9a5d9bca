pub mod assignment;
pub mod checksum;
pub mod cluster;
pub mod cluster_set;
pub mod color;
pub mod convergence;
pub mod distance;
pub mod initializer;
pub mod update;
pub mod utils;
