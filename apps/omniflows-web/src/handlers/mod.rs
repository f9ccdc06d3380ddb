pub mod health;
pub mod public_config;
