pub mod amenity;
pub mod context;
pub mod energy;
