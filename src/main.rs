use axum::Server;
use clap::{Arg, Command};
use pledgekit::{AppState, cache, config::Config, db, error::AppResult, init_tracing, routes};
use std::net::SocketAddr;
use std::sync::Arc;

fn cli() -> Command {
    Command::new("pledgekit")
        .about("PledgeKit backend server")
        .subcommand(
            Command::new("serve").about("Run the HTTP server (default)").arg(
                Arg::new("port")
                    .long("port")
                    .value_name("PORT")
                    .value_parser(clap::value_parser!(u16))
                    .help("Overrides PORT"),
            ),
        )
        .subcommand(Command::new("check-config").about("Load and validate configuration, then exit"))
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    match matches.subcommand() {
        Some(("check-config", _)) => {
            println!("Configuration OK: {:?}", config);
        }
        Some(("serve", args)) => {
            if let Some(port) = args.get_one::<u16>("port") {
                config.port = *port;
            }
            run(config).await;
        }
        _ => run(config).await,
    }
}

async fn run(config: Config) {
    init_tracing(&config);
    if let Err(e) = serve(config).await {
        tracing::error!("Server failed: {}", e);
        std::process::exit(1);
    }
}

async fn serve(config: Config) -> AppResult<()> {
    let pool = db::create_pool(&config)?;
    let store = cache::session_store_from_config(&config)?;

    let addr: SocketAddr = config.server_address().parse().map_err(|e| {
        pledgekit::error::AppError::Config(format!(
            "Invalid listen address {}: {}",
            config.server_address(),
            e
        ))
    })?;
    let environment = config.node_env;

    let state = Arc::new(AppState::new(pool, config, store)?);
    let app = routes::create_router(state);

    tracing::info!(address = %addr, environment = environment.as_str(), "Server running");
    Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|e| pledgekit::error::AppError::internal(format!("Server error: {}", e)))
}
