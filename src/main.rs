use anyhow::{Context, Result};
use chrono::Local;
use dotenvy::dotenv;

use attendance::{api, config::Config, models::LoginReqDto, state::AppState};

use tracing::{info, warn};
use tracing_appender::rolling;

fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::from_env().context("invalid configuration")?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Attendance tracker starting...");

    let today = Local::now().date_naive();
    let demo_login = config.demo_email.clone().zip(config.demo_password.clone());

    let mut state = AppState::from_config(config, today).context("failed to restore session")?;

    if !state.auth.is_authenticated() {
        if let Some((email, password)) = demo_login {
            let req = LoginReqDto { email, password };
            if !state.auth.login(&state.directory, &req)? {
                warn!(email = %req.email, "Demo login rejected");
            }
        }
    }

    let view = match api::dashboard::dashboard(&state, today) {
        Ok(view) => view,
        Err(e) => {
            info!(error = %e, "Nothing to show");
            println!("Not logged in. Set DEMO_EMAIL and DEMO_PASSWORD to sign in.");
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
