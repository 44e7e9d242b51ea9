pub mod booking_models;
pub mod booking_repository;

pub use booking_models::Booking;
pub use booking_repository::{BookingDirectory, BookingRepository};
