pub mod model;
pub mod query;

pub use model::DetectionModel;
pub use query::{ConvergenceStatus, DetectionQuery, Inversion, InversionQuery};
