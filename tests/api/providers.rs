//! Real provider clients against local fakes of the Resend and Google APIs.

use std::{
    net::TcpListener,
    sync::{Arc, Mutex},
};

use actix_web::{http::StatusCode, web, App, HttpRequest, HttpResponse, HttpServer};
use lusso::{
    configuration::{ApplicationSettings, EmailSettings, SheetsSettings},
    errors::RelayError,
    services::{
        ContactRelay, EmailSender, GoogleSheetsClient, OutboundEmail, ResendClient, SheetAppender,
        VisionRelay,
    },
};
use serde_json::json;

use crate::helpers::spawn_app;

const CLIENT_EMAIL: &str = "relay@lusso-sheets.iam.gserviceaccount.com";
const PRIVATE_KEY: &str = include_str!("../fixtures/service_account_key.pem");

#[derive(Debug, Clone)]
struct RecordedRequest {
    path: String,
    query: String,
    authorization: Option<String>,
    body: Vec<u8>,
}

impl RecordedRequest {
    fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

struct ProviderState {
    routes: Vec<(&'static str, u16, serde_json::Value)>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

struct FakeProvider {
    address: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeProvider {
    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(req: HttpRequest, body: web::Bytes, state: web::Data<ProviderState>) -> HttpResponse {
    state.requests.lock().unwrap().push(RecordedRequest {
        path: req.path().to_string(),
        query: req.query_string().to_string(),
        authorization: req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .map(|h| h.to_string()),
        body: body.to_vec(),
    });

    match state
        .routes
        .iter()
        .find(|(prefix, _, _)| req.path().starts_with(prefix))
    {
        Some((_, status, reply)) => {
            HttpResponse::build(StatusCode::from_u16(*status).unwrap()).json(reply)
        }
        None => HttpResponse::NotFound().finish(),
    }
}

/// Each route is `(path prefix, status, json reply)`; every request is recorded.
async fn spawn_provider(routes: Vec<(&'static str, u16, serde_json::Value)>) -> FakeProvider {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(vec![]));
    let state = web::Data::new(ProviderState {
        routes,
        requests: requests.clone(),
    });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .default_service(web::to(record))
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen")
    .run();
    let _ = tokio::spawn(server);

    FakeProvider {
        address: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

fn outbound_email() -> OutboundEmail {
    OutboundEmail {
        from: "Lusso <hello@lusso.in>".to_string(),
        to: vec!["studio@lusso.in".to_string()],
        reply_to: "asha@example.com".to_string(),
        subject: "New enquiry from Asha — Lusso website".to_string(),
        text: "From: Asha <asha@example.com>\n\nNeed a kitchen quote".to_string(),
    }
}

fn sheets_settings(provider: &FakeProvider) -> SheetsSettings {
    SheetsSettings {
        base_url: provider.address.clone(),
        token_url: format!("{}/token", provider.address),
        range: "Responses!A1".to_string(),
        value_input_option: "USER_ENTERED".to_string(),
        service_account_email: Some(CLIENT_EMAIL.to_string()),
        private_key: Some(PRIVATE_KEY.to_string()),
        spreadsheet_id: Some("sheet-123".to_string()),
    }
}

#[tokio::test]
async fn resend_client_posts_email() {
    let provider = spawn_provider(vec![("/emails", 200, json!({ "id": "49a3999c" }))]).await;
    let client = ResendClient::new(&provider.address, "re_test_key".to_string());

    client.send(&outbound_email()).await.unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/emails");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer re_test_key"));
    assert_eq!(
        requests[0].json(),
        json!({
            "from": "Lusso <hello@lusso.in>",
            "to": ["studio@lusso.in"],
            "reply_to": "asha@example.com",
            "subject": "New enquiry from Asha — Lusso website",
            "text": "From: Asha <asha@example.com>\n\nNeed a kitchen quote"
        })
    );
}

#[tokio::test]
async fn resend_client_surfaces_provider_message() {
    let provider = spawn_provider(vec![(
        "/emails",
        403,
        json!({
            "statusCode": 403,
            "message": "The lusso.in domain is not verified.",
            "name": "validation_error"
        }),
    )])
    .await;
    let client = ResendClient::new(&provider.address, "re_test_key".to_string());

    let result = client.send(&outbound_email()).await;

    match result {
        Err(RelayError::SendFailed(message)) => {
            assert_eq!(message, "The lusso.in domain is not verified.")
        }
        other => panic!("expected SendFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn resend_client_falls_back_to_send_failed() {
    let provider = spawn_provider(vec![("/emails", 500, json!({}))]).await;
    let client = ResendClient::new(&provider.address, "re_test_key".to_string());

    let result = client.send(&outbound_email()).await;

    assert!(matches!(result, Err(RelayError::SendFailed(m)) if m == "send_failed"));
}

#[tokio::test]
async fn sheets_client_exchanges_token_then_appends() {
    let provider = spawn_provider(vec![
        (
            "/token",
            200,
            json!({ "access_token": "ya29.test", "expires_in": 3599, "token_type": "Bearer" }),
        ),
        ("/v4/spreadsheets", 200, json!({ "spreadsheetId": "sheet-123" })),
    ])
    .await;
    let client = GoogleSheetsClient::new(&sheets_settings(&provider));

    client
        .append_row(vec!["2025-03-09T14:05:00.000Z".to_string(), "Asha".to_string()])
        .await
        .unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);

    let token_request = requests[0].text();
    assert_eq!(requests[0].path, "/token");
    assert!(token_request
        .contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"));
    assert!(token_request.contains("assertion="));

    assert_eq!(
        requests[1].path,
        "/v4/spreadsheets/sheet-123/values/Responses!A1:append"
    );
    assert_eq!(requests[1].query, "valueInputOption=USER_ENTERED");
    assert_eq!(requests[1].authorization.as_deref(), Some("Bearer ya29.test"));
    assert_eq!(
        requests[1].json(),
        json!({ "values": [["2025-03-09T14:05:00.000Z", "Asha"]] })
    );
}

#[tokio::test]
async fn sheets_client_reports_token_rejection() {
    let provider = spawn_provider(vec![(
        "/token",
        400,
        json!({ "error": "invalid_grant", "error_description": "Invalid JWT Signature." }),
    )])
    .await;
    let client = GoogleSheetsClient::new(&sheets_settings(&provider));

    let result = client.append_row(vec!["row".to_string()]).await;

    assert!(matches!(result, Err(RelayError::AppendFailed(m)) if m == "Invalid JWT Signature."));
    assert_eq!(provider.requests().len(), 1);
}

#[tokio::test]
async fn sheets_client_reports_append_rejection() {
    let provider = spawn_provider(vec![
        ("/token", 200, json!({ "access_token": "ya29.test" })),
        (
            "/v4/spreadsheets",
            429,
            json!({
                "error": {
                    "code": 429,
                    "message": "Quota exceeded for quota metric 'Write requests'",
                    "status": "RESOURCE_EXHAUSTED"
                }
            }),
        ),
    ])
    .await;
    let client = GoogleSheetsClient::new(&sheets_settings(&provider));

    let result = client.append_row(vec!["row".to_string()]).await;

    assert!(matches!(
        result,
        Err(RelayError::AppendFailed(m)) if m == "Quota exceeded for quota metric 'Write requests'"
    ));
}

#[tokio::test]
async fn relays_built_from_settings_reach_providers() {
    let resend = spawn_provider(vec![("/emails", 200, json!({ "id": "49a3999c" }))]).await;
    let google = spawn_provider(vec![
        ("/token", 200, json!({ "access_token": "ya29.test" })),
        ("/v4/spreadsheets", 200, json!({})),
    ])
    .await;
    let email_settings = EmailSettings {
        base_url: resend.address.clone(),
        api_key: Some("re_test_key".to_string()),
        from: Some("Lusso <hello@lusso.in>".to_string()),
        to: Some("studio@lusso.in, sales@lusso.in".to_string()),
    };
    let application_settings = ApplicationSettings {
        host: "127.0.0.1".to_string(),
        port: 0,
        site_name: "Lusso".to_string(),
    };
    let app = spawn_app(
        ContactRelay::from_settings(&email_settings, &application_settings),
        VisionRelay::from_settings(&sheets_settings(&google)),
    )
    .await;

    let contact = app
        .post_contact(&json!({
            "name": "Asha",
            "email": "asha@example.com",
            "message": "Need a kitchen quote"
        }))
        .await;
    let vision = app
        .post_vision(&json!({ "name": "Asha", "finishes": ["Matte", "Oak Veneer"] }))
        .await;

    assert_eq!(200, contact.status().as_u16());
    assert_eq!(200, vision.status().as_u16());

    let sent = resend.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].json()["to"], json!(["studio@lusso.in", "sales@lusso.in"]));

    let appended = google.requests();
    assert_eq!(appended.len(), 2);
    assert_eq!(appended[1].json()["values"][0][5], "Matte, Oak Veneer");
}
