pub mod legacy;
pub mod personnel;
pub mod rotation;
pub mod scheduling;
pub mod tenancy;
