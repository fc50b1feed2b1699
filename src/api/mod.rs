mod engine;

pub use engine::ClusterEngine;
