pub mod game;
pub mod registration;
pub mod shared;
