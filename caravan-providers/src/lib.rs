pub mod duffel;
pub mod envelope;
pub mod ratehawk;
pub mod tables;
pub mod tbo;

pub use duffel::DuffelClient;
pub use ratehawk::RatehawkClient;
pub use tables::ResolutionTables;
pub use tbo::TboClient;
