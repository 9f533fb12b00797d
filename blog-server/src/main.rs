mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpServer, web};

use application::comment_service::CommentService;
use application::post_service::PostService;
use data::comment_repository::PostgresCommentRepository;
use data::post_repository::PostgresPostRepository;
use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use presentation::handlers;
use presentation::middleware::{RequestIdMiddleware, TimingMiddleware};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = AppConfig::from_env().expect("invalid configuration");
    let pool = create_pool(&config.database_url)
        .await
        .expect("failed to connect to database");
    run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    let post_repo = Arc::new(PostgresPostRepository::new(pool.clone()));
    let comment_repo = Arc::new(PostgresCommentRepository::new(pool.clone()));

    let post_service = PostService::new(Arc::clone(&post_repo));
    let comment_service = CommentService::new(Arc::clone(&comment_repo), Arc::clone(&post_repo));

    let config_data = config.clone();

    HttpServer::new(move || {
        let cors = build_cors(&config_data);
        App::new()
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .wrap(TimingMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .app_data(web::Data::new(post_service.clone()))
            .app_data(web::Data::new(comment_service.clone()))
            .service(handlers::health::health)
            .service(handlers::post::list)
            .service(handlers::post::get_by_id)
            .service(handlers::post::create)
            .service(handlers::post::update)
            .service(handlers::post::delete_by_id)
            .service(handlers::post::change_displayed)
            .service(handlers::post::displayed)
            .service(handlers::post::like)
            .service(handlers::post::dislike)
            .service(handlers::post::popular)
            .service(handlers::post::search)
            .service(handlers::post::get_by_author)
            .service(handlers::comment::create)
            .service(handlers::comment::delete_by_id)
            .service(handlers::comment::change_displayed)
            .service(handlers::comment::displayed)
            .service(handlers::comment::like)
            .service(handlers::comment::dislike)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}
