pub mod assist;
pub(crate) mod health;
pub mod interactions;
pub mod model;

pub use health::health_check;
