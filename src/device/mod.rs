pub mod device_dto;
pub mod device_handlers;
pub mod device_models;
pub mod device_repository;

pub use device_dto::RegisterDeviceRequest;
pub use device_handlers::{deactivate_device, register_device};
pub use device_models::{DevicePlatform, DeviceToken};
pub use device_repository::{DeviceTokenRepository, DeviceTokenStore};
