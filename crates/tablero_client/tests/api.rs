use pretty_assertions::assert_eq;
use tablero_client::{ApiClient, ApiError, ApiSettings, ReqwestApiClient, TallerSpec};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestApiClient {
    client_with_csrf(server, None)
}

fn client_with_csrf(server: &MockServer, csrf: Option<&str>) -> ReqwestApiClient {
    let settings = ApiSettings {
        base_url: server.uri(),
        login_path: "/login".to_string(),
        csrf_token: csrf.map(str::to_string),
    };
    ReqwestApiClient::new(settings).expect("client builds")
}

#[tokio::test]
async fn refresh_returns_the_decoded_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tools/rpa-enargas/table"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "html": "<tr><td></td></tr>",
            "pagination": "<div class=\"pagination\" data-page=\"2\" data-total-pages=\"4\"></div>",
            "total": 31,
            "page": 2,
            "total_pages": 4,
            "has_pending": true
        })))
        .mount(&server)
        .await;

    let payload = client_for(&server)
        .refresh_table("/tools/rpa-enargas/table")
        .await
        .expect("refresh ok");
    assert_eq!(payload.total, Some(31));
    assert_eq!(payload.page, Some(2));
    assert!(payload.has_pending);
}

#[tokio::test]
async fn a_redirect_is_an_expired_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tools/rpa-enargas/table"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/login?next=%2F"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .refresh_table("/tools/rpa-enargas/table")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::SessionExpired {
            location: "/login?next=%2F".to_string()
        }
    );
}

#[tokio::test]
async fn an_html_body_where_json_belongs_is_an_expired_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tools/rpa-enargas/session-status"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<!DOCTYPE html><html><body>Iniciar sesion</body></html>",
            "text/html; charset=utf-8",
        ))
        .mount(&server)
        .await;

    let err = client_for(&server).session_status().await.unwrap_err();
    assert_eq!(
        err,
        ApiError::SessionExpired {
            location: "/login".to_string()
        }
    );
}

#[tokio::test]
async fn a_polling_http_failure_is_retryable_not_an_expiry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tools/rpa-enargas/table"))
        .respond_with(ResponseTemplate::new(500).set_body_raw(
            "<html><body>Internal Server Error</body></html>",
            "text/html",
        ))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .refresh_table("/tools/rpa-enargas/table")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::Api {
            status: 500,
            message: "refresh failed".to_string()
        }
    );
}

#[tokio::test]
async fn a_non_json_non_html_body_is_unexpected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tools/rpa-enargas/table"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("oops", "text/plain"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .refresh_table("/tools/rpa-enargas/table")
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::UnexpectedBody);
}

#[tokio::test]
async fn create_surfaces_the_server_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tools/rpa-enargas"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "Formato de patente invalido."
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_job(
            "ZZZ",
            &TallerSpec::Existing {
                id: "3".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::Api {
            status: 400,
            message: "Formato de patente invalido.".to_string()
        }
    );
}

#[tokio::test]
async fn create_falls_back_to_a_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tools/rpa-enargas"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_job(
            "AB123CD",
            &TallerSpec::New {
                nombre: "Taller Sur".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::Api {
            status: 500,
            message: "Error al crear proceso.".to_string()
        }
    );
}

#[tokio::test]
async fn delete_posts_ids_with_the_csrf_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tools/rpa-enargas/delete"))
        .and(header("X-CSRFToken", "tok-123"))
        .and(body_json(serde_json::json!({ "ids": [4, 9] })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "deleted": 2 })),
        )
        .mount(&server)
        .await;

    let payload = client_with_csrf(&server, Some("tok-123"))
        .delete_jobs(&[4, 9])
        .await
        .expect("delete ok");
    assert_eq!(payload.deleted, 2);
}

#[tokio::test]
async fn assign_taller_round_trips_the_new_assignment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tools/rpa-enargas/7/taller"))
        .and(body_json(serde_json::json!({ "taller_id": "5" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "taller_id": 5,
            "taller_nombre": "Taller Sur"
        })))
        .mount(&server)
        .await;

    let payload = client_for(&server)
        .assign_taller(7, "5")
        .await
        .expect("assign ok");
    assert_eq!(payload.taller_id, Some(5));
    assert_eq!(payload.taller_nombre.as_deref(), Some("Taller Sur"));
}

#[tokio::test]
async fn session_status_decodes_the_deadlines() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tools/rpa-enargas/session-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "state": "cooldown",
            "cooldown_until": 1760000090
        })))
        .mount(&server)
        .await;

    let payload = client_for(&server).session_status().await.expect("status ok");
    assert_eq!(payload.state, "cooldown");
    assert_eq!(payload.cooldown_until, Some(1_760_000_090));
    assert_eq!(payload.active_until, None);
}

#[tokio::test]
async fn generate_returns_the_rendered_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tools/img-to-pdf/generate"))
        .and(body_json(serde_json::json!({
            "images": ["data:image/png;base64,AAA"],
            "filename": "legajo"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "row_html": "<tr><td></td><td>05/08/26</td><td>legajo.pdf</td></tr>"
        })))
        .mount(&server)
        .await;

    let payload = client_for(&server)
        .generate_document(&["data:image/png;base64,AAA".to_string()], "legajo")
        .await
        .expect("generate ok");
    assert!(payload.row_html.is_some());
}
