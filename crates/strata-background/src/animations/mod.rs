//! Background layers. The driver composites them as particles, strata,
//! topography, drones, then the geoid.

pub mod drones;
pub mod geoid;
pub mod particles;
pub mod terrain;
