pub mod tenancy_repo;
pub use tenancy_repo::TenantRepository;
pub mod personnel_repo;
pub use personnel_repo::PersonnelRepository;
pub mod shift_repo;
pub use shift_repo::ShiftRepository;
pub mod rotation_repo;
pub use rotation_repo::RotationRepository;
