pub mod db;
pub mod email;
pub mod extractors;
pub mod handlers;
pub mod names;
pub mod rejections;
pub mod services;
pub mod statics;
pub mod storage;
pub mod utils;
pub mod views;

use axum::Router;

use services::{auth::AuthService, quiz::QuizService};
use storage::ImageStore;

#[derive(Clone)]
pub struct AppState {
    pub db: db::Db,
    pub auth: AuthService,
    pub quiz: QuizService,
    pub images: ImageStore,
    pub secure_cookies: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::homepage::routes())
        .merge(handlers::auth::routes())
        .merge(handlers::quiz::routes())
        .merge(handlers::scoreboard::routes())
        .merge(handlers::images::routes())
        .merge(handlers::admin::routes())
        .nest("/static", statics::routes())
        .with_state(state)
}
