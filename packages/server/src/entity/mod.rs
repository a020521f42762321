pub mod game;
pub mod registration;
