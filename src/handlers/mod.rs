pub mod admin;
pub mod auth;
pub mod homepage;
pub mod images;
pub mod quiz;
pub mod scoreboard;
