use std::time::Duration;

use clap::Parser;
use quizround::db::Db;
use quizround::email::ResendEmailSender;
use quizround::services::auth::AuthService;
use quizround::services::quiz::{QuizService, ScoringConfig};
use quizround::storage::ImageStore;
use quizround::AppState;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Postgres connection URL.
    #[clap(env)]
    database_url: String,

    /// The address to bind to.
    #[arg(short, long, env, default_value = "127.0.0.1:3000")]
    address: String,

    /// Public base URL, used to build magic-link URLs.
    #[arg(long, env, default_value = "http://localhost:3000")]
    base_url: String,

    /// Directory for uploaded question images.
    #[arg(long, env, default_value = "./uploads")]
    upload_dir: String,

    /// Resend API key; when absent, login links are logged instead of sent.
    #[arg(long, env)]
    resend_api_key: Option<String>,

    /// From address for outgoing email.
    #[arg(long, env, default_value = "Quizround <noreply@quizround.example>")]
    email_from: String,

    /// Minutes before a magic link expires.
    #[arg(long, env, default_value_t = 15)]
    magic_link_expiry_minutes: i64,

    /// Per-question countdown in seconds.
    #[arg(long, env, default_value_t = 10)]
    timer_seconds: u32,

    /// Score for an instant correct answer.
    #[arg(long, env, default_value_t = 100)]
    max_score: i32,

    /// Score for a correct answer after the timer has run out.
    #[arg(long, env, default_value_t = 50)]
    min_score: i32,

    /// Mark session cookies as Secure (set behind TLS).
    #[arg(long, env, default_value_t = false)]
    secure_cookies: bool,

    /// Seconds between sweeps of expired or used magic tokens.
    #[arg(long, env, default_value_t = 3600)]
    token_sweep_interval_seconds: u64,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,quizround=debug".to_owned());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let db = Db::new(&args.database_url).await?;
    let images = ImageStore::new(&args.upload_dir)?;

    let email = ResendEmailSender::new(args.resend_api_key.clone(), args.email_from.clone());
    let auth = AuthService::new(
        db.clone(),
        email,
        args.base_url.trim_end_matches('/').to_string(),
        args.magic_link_expiry_minutes,
    );

    let scoring = ScoringConfig {
        timer_seconds: args.timer_seconds,
        max_score: args.max_score,
        min_score: args.min_score,
    };
    let quiz = QuizService::new(db.clone(), scoring);

    // Periodic cleanup of expired or used magic tokens, independent of the
    // request path.
    {
        let auth = auth.clone();
        let interval = Duration::from_secs(args.token_sweep_interval_seconds);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = auth.cleanup_expired_tokens().await {
                    tracing::error!("token sweep failed: {e}");
                }
            }
        });
    }

    let state = AppState {
        db,
        auth,
        quiz,
        images,
        secure_cookies: args.secure_cookies,
    };

    let routes = quizround::router(state);

    let address = args.address.parse::<std::net::SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!("listening on {address}");
    axum::serve(listener, routes).await?;

    Ok(())
}
