mod layout;

pub mod admin;
pub mod auth;
pub mod homepage;
pub mod quiz;
pub mod scoreboard;

pub use layout::{page, page_for};
