/// API route modules
pub mod contact;
pub mod health;
