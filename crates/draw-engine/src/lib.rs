pub mod allocation;
pub mod error;
pub mod player;
pub mod rng;
pub mod seed;
pub mod selection;
pub mod settings;
pub mod store;
