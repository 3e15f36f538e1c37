pub mod models;
pub mod rng;
pub mod arena;
pub mod bot_strategy;
pub mod bot_profiles;
