use std::net::TcpListener;

use actix_web::{
    dev::Server,
    error::JsonPayloadError,
    middleware::Logger,
    web::{self, Data},
    App, HttpRequest, HttpServer,
};

use crate::{
    errors::RelayError,
    routes::{contact_route, default_route, vision_route},
    services::{ContactRelay, VisionRelay},
};

const MAX_FORM_BYTES: usize = 64 * 1024;

pub fn run(
    listener: TcpListener,
    contact_relay: ContactRelay,
    vision_relay: VisionRelay,
) -> Result<Server, std::io::Error> {
    let contact_relay = Data::new(contact_relay);
    let vision_relay = Data::new(vision_relay);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(json_config())
            .service(default_route::health_check)
            .service(
                web::scope("/api")
                    .service(contact_route::submit_contact)
                    .service(vision_route::submit_vision),
            )
            .app_data(contact_relay.clone())
            .app_data(vision_relay.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

/// Unreadable bodies get the same structured reply as an invalid form.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_FORM_BYTES)
        .content_type_required(false)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            log::warn!("Rejected unreadable form body: {}", err);
            RelayError::InvalidInput.into()
        })
}
