use actix_web::{post, web, HttpResponse};

use crate::{
    domain::ContactForm,
    errors::{RelayError, RelayReply},
    services::ContactRelay,
};

#[post("/contact")]
pub async fn submit_contact(
    relay: web::Data<ContactRelay>,
    body: web::Json<ContactForm>,
) -> Result<HttpResponse, RelayError> {
    relay.submit(body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(RelayReply::success()))
}
