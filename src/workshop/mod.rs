pub mod workshop_models;
pub mod workshop_repository;

pub use workshop_models::Workshop;
pub use workshop_repository::{WorkshopDirectory, WorkshopRepository};
