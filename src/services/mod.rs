pub mod auth;
pub mod import;
pub mod quiz;
pub mod scoreboard;
