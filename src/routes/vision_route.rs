use actix_web::{post, web, HttpResponse};

use crate::{
    domain::VisionIntake,
    errors::{RelayError, RelayReply},
    services::VisionRelay,
};

/// Reads the raw body so a malformed questionnaire fails with the vision
/// error shape instead of the contact form's `invalid_input`.
#[post("/start-vision")]
pub async fn submit_vision(
    relay: web::Data<VisionRelay>,
    body: web::Bytes,
) -> Result<HttpResponse, RelayError> {
    let intake = VisionIntake::from_slice(&body)?;
    relay.submit(intake).await?;

    Ok(HttpResponse::Ok().json(RelayReply::success()))
}
