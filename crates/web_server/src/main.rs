//! Main entry point for the Wanderlens marketplace backend server.
//! This crate wires the REST API endpoints and serves uploaded images.

use std::path::Path;
use std::sync::Arc;

use actix_files::Files;
use actix_web::{App, HttpServer, middleware::Logger, web};
use auth_services::middleware::AuthMiddleware;
use notification_services::{
    EmailService, ExpoPushService, HttpEmailService, MockEmailService, Notifier,
};
use postgres::database::*;
use web_handlers::*;

mod seed;

fn get_uploads_dir() -> String {
    let dir = std::env::var("UPLOADS_DIR").unwrap_or_else(|_| "./uploads".to_string());

    if !Path::new(&dir).exists() {
        if let Err(e) = std::fs::create_dir_all(&dir) {
            log::warn!("⚠️  Could not create uploads directory {}: {}", dir, e);
        }
    }

    dir
}

/// Picks the email transport: the HTTP API when credentials are present,
/// the logging mock otherwise so development setups still boot.
fn build_email_service() -> Arc<dyn EmailService> {
    match HttpEmailService::new() {
        Ok(service) => {
            log::info!("📧 Email service initialized");
            Arc::new(service)
        }
        Err(e) => {
            log::warn!("⚠️  Email service unavailable ({}), using mock transport", e);
            Arc::new(MockEmailService)
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🚀 Starting Wanderlens marketplace server...");

    // Create database connection pool
    let pool = match create_connection_pool().await {
        Ok(pool) => {
            log::info!("🗃️ Database pool created successfully");

            if let Err(e) = test_connection(&pool).await {
                log::error!("❌ Database connection test failed: {}", e);
            }
            pool
        }
        Err(e) => {
            log::error!("❌ Failed to create database pool: {}", e);
            log::error!("💡 Make sure PostgreSQL is running and DATABASE_URL is set");
            std::process::exit(1);
        }
    };

    // Bootstrap the schema so a fresh database is immediately usable
    if let Err(e) = ensure_schema(&pool).await {
        log::error!("❌ Failed to bootstrap schema: {}", e);
        std::process::exit(1);
    }
    log::info!("🗃️ Schema ready");

    // Seed the admin account from environment credentials
    seed::seed_admin(&pool).await;

    // Create the notification dispatcher
    let notifier = Notifier::new(Arc::new(ExpoPushService::new()), build_email_service());
    let notifier = web::Data::new(notifier);
    log::info!("📱 Push notifications via Expo");

    let uploads_dir = get_uploads_dir();
    log::info!("📁 Serving uploaded images from: {}", uploads_dir);

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    log::info!("🌐 Server will be available at: http://{}:{}", host, port);

    HttpServer::new(move || {
        let uploads_dir = uploads_dir.clone();

        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(notifier.clone())
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    // Authentication is attached here; the role-checked
                    // extractors in the handlers enforce it per route, so
                    // public routes coexist with protected ones.
                    .wrap(AuthMiddleware)
                    // Public routes
                    .route("/health", web::get().to(health))
                    .route("/register", web::post().to(register))
                    .route("/login", web::post().to(login))
                    .route("/forgot-password", web::post().to(forgot_password))
                    .route("/reset-password", web::post().to(reset_password))
                    .route("/itineraries", web::get().to(list_itineraries))
                    // Own-profile routes (any authenticated role)
                    .route("/me", web::get().to(me))
                    .route("/profile", web::put().to(update_profile))
                    .route("/password", web::put().to(change_password))
                    // Experience catalog: public browse, provider submit
                    .service(
                        web::resource("/experiences")
                            .route(web::get().to(list_experiences))
                            .route(web::post().to(submit_experience)),
                    )
                    .route("/experiences/mine", web::get().to(my_experiences))
                    // Booking routes
                    .route("/bookings", web::post().to(create_booking))
                    .route("/bookings/mine", web::get().to(my_bookings))
                    .route(
                        "/bookings/{booking_id}/confirm",
                        web::patch().to(confirm_booking),
                    )
                    // Admin review queues and actions
                    .service(
                        web::scope("/admin")
                            .route("/providers", web::get().to(list_providers))
                            .route(
                                "/providers/{provider_id}/approve",
                                web::patch().to(approve_provider),
                            )
                            .route(
                                "/providers/{provider_id}/reject",
                                web::patch().to(reject_provider),
                            )
                            .route("/experiences", web::get().to(list_admin_experiences))
                            .route(
                                "/experiences/{experience_id}/approve",
                                web::patch().to(approve_experience),
                            )
                            .route(
                                "/experiences/{experience_id}/reject",
                                web::patch().to(reject_experience),
                            )
                            .route("/users", web::get().to(list_users))
                            .route("/bookings", web::get().to(list_admin_bookings))
                            .route("/notifications", web::post().to(broadcast_notification)),
                    ),
            )
            .service(Files::new("/uploads", uploads_dir))
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
