pub mod candidature;
pub mod offer;
