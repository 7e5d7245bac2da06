use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use dotenv::dotenv;
use tracing::info;

use warranty_registration::config::Config;
use warranty_registration::handlers::registration::RegistrationHandler;
use warranty_registration::mailchimp::MailchimpClient;
use warranty_registration::notify::NoopNotifier;
use warranty_registration::routes;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    dotenv().ok();

    let config = Config::from_env().context("failed to load configuration")?;
    let client = MailchimpClient::new(&config.mailchimp)?;
    let handler = web::Data::new(RegistrationHandler::new(client));

    info!(
        port = config.port,
        audience = %config.mailchimp.audience_id,
        "starting warranty registration service"
    );

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(handler.clone())
            .configure(routes::init::<MailchimpClient, NoopNotifier>)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await?;

    Ok(())
}
