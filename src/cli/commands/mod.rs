pub mod health;
pub mod kb;
pub mod upload;
