pub mod assignments;
pub mod health;
pub mod imports;
pub mod personnel;
pub mod rotation;
