use thiserror::Error;

pub type ClusterResult<T> = Result<T, ClusterError>;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("invalid cluster configuration: {0}")]
    InvalidConfig(String),

    #[error("unsupported layout algorithm: {0}")]
    UnsupportedLayout(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("cannot update aggregated point at output entry {entry}")]
    AggregatedPointUpdate { entry: usize },
}
