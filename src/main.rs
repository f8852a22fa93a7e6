#[macro_use]
extern crate diesel;

mod database;
mod doctor;
mod errors;
mod models;
mod patient;
mod payment;
mod protocol;
mod schedule;
mod schema;
mod staff;
mod utils;

use actix_web::{web, App, HttpServer};
use diesel::{r2d2::ConnectionManager, MysqlConnection};

use payment::provider::PaymentProvider;

type DbPool = r2d2::Pool<ConnectionManager<MysqlConnection>>;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let conn_url = std::env::var("DATABASE_URL").expect("DATABASE_URL not found");
    let manager = ConnectionManager::<MysqlConnection>::new(conn_url);
    let pool = r2d2::Pool::builder()
        .build(manager)
        .expect("Failed to create pool");

    let provider = PaymentProvider::from_env();

    let bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    HttpServer::new(move || {
        App::new()
            .data(pool.clone())
            .data(provider.clone())
            // patient
            .service(
                web::scope("/patient")
                    .configure(patient::config),
            )
            // doctor
            .service(
                web::scope("/doctor")
                    .configure(doctor::config),
            )
            // staff
            .service(
                web::scope("/staff")
                    .configure(staff::config),
            )
            // payment
            .service(
                web::scope("/payment")
                    .configure(payment::config),
            )
            // medication schedules
            .service(
                web::scope("/schedule")
                    .configure(schedule::config),
            )
    })
    .bind(bind)?
    .run()
    .await
}
