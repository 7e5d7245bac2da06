use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, web};
use tracing::{Instrument, info_span, warn};
use uuid::Uuid;

use crate::handlers::registration::{RegistrationError, RegistrationHandler};
use crate::mailchimp::MailingListClient;
use crate::models::registration::{ErrorResponse, RegistrationResponse, RegistrationSubmission};
use crate::notify::Notifier;

pub const INVALID_BODY: &str = "Invalid request body";

impl ResponseError for RegistrationError {
    fn status_code(&self) -> StatusCode {
        match self {
            RegistrationError::Validation(_) => StatusCode::BAD_REQUEST,
            RegistrationError::CreateFailed(_) | RegistrationError::UpdateFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.public_message()))
    }
}

async fn register_warranty<C: MailingListClient, N: Notifier>(
    handler: web::Data<RegistrationHandler<C, N>>,
    body: web::Json<RegistrationSubmission>,
) -> HttpResponse {
    let span = info_span!("register_warranty", request_id = %Uuid::new_v4());

    match handler.register(body.into_inner()).instrument(span).await {
        Ok(registration) => HttpResponse::Ok().json(RegistrationResponse::from(registration)),
        Err(e) => e.error_response(),
    }
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        warn!("rejected registration body: {}", err);
        let response = HttpResponse::BadRequest().json(ErrorResponse::new(INVALID_BODY));
        InternalError::from_response(err, response).into()
    })
}

pub fn init<C: MailingListClient, N: Notifier>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/register-warranty")
            .app_data(json_config())
            .route(web::post().to(register_warranty::<C, N>)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::registration::GENERIC_FAILURE;
    use crate::mailchimp::fake::{Call, FakeMailingList, Reply};
    use crate::models::contact::contact_fingerprint;
    use crate::notify::NoopNotifier;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    struct Outcome {
        status: StatusCode,
        body: Value,
        calls: Vec<Call>,
    }

    async fn post(create: Reply, update: Reply, body: Value) -> Outcome {
        let client = FakeMailingList::new(create, update);
        let handler = web::Data::new(RegistrationHandler::new(client));
        let app = test::init_service(
            App::new()
                .app_data(handler.clone())
                .configure(crate::routes::init::<FakeMailingList, NoopNotifier>),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/register-warranty")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();

        Outcome {
            status,
            body: test::read_body_json(resp).await,
            calls: handler.client().calls(),
        }
    }

    fn valid_body() -> Value {
        json!({
            "firstName": "Grace",
            "lastName": "Hopper",
            "email": "Grace@Navy.mil",
            "orderId": "702-1234567-1234567"
        })
    }

    fn with(mut body: Value, field: &str, value: Value) -> Value {
        body[field] = value;
        body
    }

    #[actix_web::test]
    async fn successful_registration_echoes_the_email() {
        let outcome = post(Reply::Ok, Reply::Ok, valid_body()).await;

        assert_eq!(outcome.status, StatusCode::OK);
        assert_eq!(outcome.body["success"], true);
        assert_eq!(outcome.body["message"], "Warranty registered successfully");
        assert_eq!(outcome.body["data"]["email"], "Grace@Navy.mil");
        let date = outcome.body["data"]["registrationDate"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(date).is_ok());
        assert_eq!(outcome.calls.len(), 1);
    }

    #[actix_web::test]
    async fn validation_failures_are_400_with_the_reason() {
        let without_order_id = {
            let mut body = valid_body();
            body.as_object_mut().unwrap().remove("orderId");
            body
        };
        let cases = [
            (without_order_id, "All fields are required"),
            (with(valid_body(), "firstName", json!("")), "All fields are required"),
            (with(valid_body(), "lastName", Value::Null), "All fields are required"),
            (with(valid_body(), "email", json!("grace navy.mil")), "Invalid email address"),
            (
                with(valid_body(), "orderId", json!("702-12345678-123456")),
                "Invalid Amazon Order ID format",
            ),
        ];

        for (body, message) in cases {
            let outcome = post(Reply::Ok, Reply::Ok, body).await;

            assert_eq!(outcome.status, StatusCode::BAD_REQUEST);
            assert_eq!(outcome.body, json!({"success": false, "error": message}));
            assert!(outcome.calls.is_empty());
        }
    }

    #[actix_web::test]
    async fn malformed_bodies_are_rejected() {
        let mut body = valid_body();
        body["referrer"] = json!("newsletter");

        for body in [body, json!("just a string")] {
            let outcome = post(Reply::Ok, Reply::Ok, body).await;

            assert_eq!(outcome.status, StatusCode::BAD_REQUEST);
            assert_eq!(outcome.body, json!({"success": false, "error": INVALID_BODY}));
            assert!(outcome.calls.is_empty());
        }
    }

    #[actix_web::test]
    async fn existing_member_is_updated() {
        let outcome = post(Reply::MemberExists, Reply::Ok, valid_body()).await;

        assert_eq!(outcome.status, StatusCode::OK);
        assert_eq!(outcome.body["success"], true);
        assert!(matches!(
            &outcome.calls[..],
            [Call::Create(_), Call::Update(fingerprint, _)]
                if *fingerprint == contact_fingerprint("grace@navy.mil")
        ));
    }

    #[actix_web::test]
    async fn provider_failures_hide_their_details() {
        for (create, update) in [
            (Reply::Status(500), Reply::Ok),
            (Reply::Status(401), Reply::Ok),
            (Reply::MemberExists, Reply::Status(500)),
            (Reply::Timeout, Reply::Ok),
        ] {
            let outcome = post(create, update, valid_body()).await;

            assert_eq!(outcome.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(outcome.body, json!({"success": false, "error": GENERIC_FAILURE}));
        }
    }
}
