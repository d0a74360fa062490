pub mod distance_matrix;
mod estimator;
pub mod models;

pub use distance_matrix::{DistanceMatrixClient, RoutingService};
pub use estimator::{straight_line_estimate, TravelEstimator};
pub use models::{RouteLeg, TravelInfo, TravelMode, TravelSource};
