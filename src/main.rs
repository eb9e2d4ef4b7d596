use std::net::TcpListener;

use anyhow::Context;
use env_logger::Env;
use lusso::{
    configuration::get_configuration,
    services::{ContactRelay, VisionRelay},
    startup::run,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().context("Failed to read configuration.")?;

    let contact_relay =
        ContactRelay::from_settings(&configuration.email, &configuration.application);
    let vision_relay = VisionRelay::from_settings(&configuration.sheets);

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener =
        TcpListener::bind(&address).with_context(|| format!("Failed to bind {}", address))?;
    log::info!("Listening on {}", address);

    run(listener, contact_relay, vision_relay)?.await?;

    Ok(())
}
