pub mod rotation_service;
pub use rotation_service::RotationService;
pub mod scheduling_service;
pub use scheduling_service::SchedulingService;
pub mod import_service;
pub use import_service::ImportService;
