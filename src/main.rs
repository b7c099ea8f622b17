use clap::Parser;
use tokio_util::sync::CancellationToken;

mod cli;
mod config;
mod error;
mod media;
mod secrets;

fn init_logging() {
    // RUST_LOG directives override the defaults below
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("showcast", log::LevelFilter::Info)
        .filter_module("ffmpeg_cli", log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
}

#[tokio::main]
async fn main() -> ! {
    init_logging();
    let cli = cli::Cli::parse();
    let dry_run = cli.dry_run;
    let config = config::SessionConfig::from(cli);

    let cancel = CancellationToken::new();

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("ctrl+c received");
            cancel_clone.cancel();
        }
    });

    let result = if dry_run {
        media::pipe::plan(config)
    } else {
        media::pipe::run(config, cancel).await
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}
