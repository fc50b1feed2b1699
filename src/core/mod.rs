pub mod axis;
pub mod types;

pub use axis::ProjectedAxis;
pub use types::DataPoint;
