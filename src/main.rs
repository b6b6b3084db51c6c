use std::{net::SocketAddr, sync::Arc};

use log::{error, info, warn};
use weatherpredict_app::{Application, build_application, domain::forecast::RandomWeatherPredictor};
use weatherpredict_memory::{
    InMemoryAuthenticationService, InMemoryEventRepository, InMemoryPredictionRepository,
};
use weatherpredict_supabase::{
    SupabaseAuthenticationService, SupabaseClient, SupabaseError, SupabaseEventRepository,
    SupabasePredictionRepository,
};
use weatherpredict_web::AppState;

use crate::config::{Backend, ServerConfig};

mod config;
mod logs;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

fn build(backend: &Backend) -> Result<Application, SupabaseError> {
    let weather_predictor = Arc::new(RandomWeatherPredictor::new());
    let app = match backend {
        Backend::Supabase(supabase) => {
            let client = SupabaseClient::new(supabase.clone())?;
            build_application(
                Arc::new(SupabaseEventRepository::new(client.clone())),
                Arc::new(SupabasePredictionRepository::new(client.clone())),
                Arc::new(SupabaseAuthenticationService::new(client)),
                weather_predictor,
            )
        }
        Backend::Memory => {
            warn!("Using the in-memory backend; accounts and events are lost on restart");
            build_application(
                Arc::new(InMemoryEventRepository::new()),
                Arc::new(InMemoryPredictionRepository::new()),
                Arc::new(InMemoryAuthenticationService::new()),
                weather_predictor,
            )
        }
    };
    Ok(app)
}

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("Failed to load .env file: {}", e);
        std::process::exit(1);
    }

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logs::init_logger(config.log_file.as_ref()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let app = match build(&config.backend) {
        Ok(app) => Arc::new(app),
        Err(e) => {
            error!("Failed to set up backend: {}", e);
            std::process::exit(1);
        }
    };

    let addr = SocketAddr::new(config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Starting application");

    let state = AppState {
        app,
        secure_cookies: config.secure_cookies,
    };
    if let Err(e) = weatherpredict_web::serve(listener, state, shutdown_signal()).await {
        error!("Web server failed: {}", e);
        std::process::exit(1);
    }
    info!("Server stopped");
}
