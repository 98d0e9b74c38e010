pub mod bfi;
pub mod error;
pub mod lake;
pub mod population;
pub mod species;
pub mod survey;
pub mod waypoint;
