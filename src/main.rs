use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};

use todoforge::auth::CredentialCodec;
use todoforge::config::Config;
use todoforge::{db, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let mut config = Config::from_env().map_err(|e| {
        log::error!("invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let scheme = match config.auth.password_scheme {
        Some(scheme) => scheme,
        None => CredentialCodec::probe(config.auth.bcrypt_cost),
    };
    config.auth.password_scheme = Some(scheme);
    log::info!("password scheme: {:?}", scheme);

    let pool = db::connect(&config.database_url).await.map_err(|e| {
        log::error!("failed to open database {}: {}", config.database_url, e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    db::init_schema(&pool)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let state = AppState::new(pool, &config.auth);

    log::info!("Starting todoforge server at {}", config.server_url());
    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .configure(move |cfg| state.configure(cfg))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
