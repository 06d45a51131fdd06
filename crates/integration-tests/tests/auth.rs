//! Login, automatic registration and logout.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::json;

use ticket_portal_integration_tests::{MockApi, TestPortal, location, unreachable_api_url};

#[tokio::test]
async fn test_unknown_email_is_registered_and_lands_on_tickets() {
    let api = MockApi::start().await;
    let portal = TestPortal::start(&api).await;

    let response = portal.login("nuevo@explora.co", "secreto").await;
    assert_eq!(location(&response), "/tickets");

    // One login, then exactly one registration with the same credentials.
    let calls = api.calls();
    let methods: Vec<_> = calls.iter().map(|c| (c.method, c.path.as_str())).collect();
    assert_eq!(methods, [("POST", "/login"), ("POST", "/user")]);
    assert_eq!(
        calls[1].body,
        json!({ "email": "nuevo@explora.co", "password": "secreto" })
    );

    // The session exists and is not an admin one.
    let page = portal.get("/tickets").await;
    assert_eq!(page.status(), StatusCode::OK);
    let body = page.text().await.unwrap();
    assert!(body.contains("Sesión iniciada como <strong>nuevo@explora.co</strong>"));

    let admin = portal.get("/tickets-admin").await;
    assert_eq!(location(&admin), "/tickets");
}

#[tokio::test]
async fn test_admin_login_lands_on_admin_view() {
    let api = MockApi::start().await;
    api.add_user("jefa@explora.co", "clave", true);
    let portal = TestPortal::start(&api).await;

    let response = portal.login("jefa@explora.co", "clave").await;
    assert_eq!(location(&response), "/tickets-admin");
    assert_eq!(api.count("POST", "/user"), 0);

    let page = portal.get("/tickets-admin").await;
    assert_eq!(page.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_user_login_lands_on_ticket_view() {
    let api = MockApi::start().await;
    api.add_user("ana@explora.co", "clave", false);
    let portal = TestPortal::start(&api).await;

    let response = portal.login("ana@explora.co", "clave").await;
    assert_eq!(location(&response), "/tickets");
}

#[tokio::test]
async fn test_wrong_password_shows_server_error_and_never_registers() {
    let api = MockApi::start().await;
    api.add_user("ana@explora.co", "clave", false);
    let portal = TestPortal::start(&api).await;

    let response = portal.login("ana@explora.co", "clave-equivocada-123").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Contraseña incorrecta"));
    // Email kept, password not echoed back.
    assert!(body.contains(r#"value="ana@explora.co""#));
    assert!(!body.contains("clave-equivocada-123"));

    assert_eq!(api.count("POST", "/user"), 0);
    assert_eq!(location(&portal.get("/tickets").await), "/");
}

#[tokio::test]
async fn test_failed_registration_shows_fallback_message() {
    let api = MockApi::start().await;
    api.fail_registration(StatusCode::INTERNAL_SERVER_ERROR, serde_json::Value::Null);
    let portal = TestPortal::start(&api).await;

    let body = portal
        .login("nuevo@explora.co", "secreto")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Error al crear el usuario"));
    assert_eq!(api.count("POST", "/user"), 1);
}

#[tokio::test]
async fn test_blank_registration_error_shows_fallback_message() {
    let api = MockApi::start().await;
    api.fail_registration(StatusCode::CONFLICT, json!({ "error": "" }));
    let portal = TestPortal::start(&api).await;

    let response = portal.login("nuevo@explora.co", "secreto").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Error al crear el usuario"));
    assert!(!body.contains(r#"role="alert"></p>"#));
}

#[tokio::test]
async fn test_blank_login_error_shows_fallback_message() {
    let api = MockApi::start().await;
    api.add_user("ana@explora.co", "clave", false);
    api.fail_login(StatusCode::UNAUTHORIZED, json!({ "error": "  " }));
    let portal = TestPortal::start(&api).await;

    let response = portal.login("ana@explora.co", "clave").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Credenciales inválidas"));
    assert_eq!(api.count("POST", "/user"), 0);
}

#[tokio::test]
async fn test_unreachable_api_shows_connection_error() {
    let portal = TestPortal::start_with_api_url(unreachable_api_url().await).await;

    let response = portal.login("ana@explora.co", "clave").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Error al conectar con el servidor"));
}

#[tokio::test]
async fn test_invalid_email_is_rejected_without_calling_api() {
    let api = MockApi::start().await;
    let portal = TestPortal::start(&api).await;

    let body = portal.login("sin-arroba", "clave").await.text().await.unwrap();
    assert!(body.contains("Correo electrónico inválido"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_login_page_redirects_when_logged_in() {
    let api = MockApi::start().await;
    api.add_user("jefa@explora.co", "clave", true);
    let portal = TestPortal::start(&api).await;

    let page = portal.get("/").await;
    assert_eq!(page.status(), StatusCode::OK);
    assert!(page.text().await.unwrap().contains("Registro / Ingreso"));

    portal.login("jefa@explora.co", "clave").await;
    assert_eq!(location(&portal.get("/").await), "/tickets-admin");
}

#[tokio::test]
async fn test_logout_ends_session() {
    let api = MockApi::start().await;
    api.add_user("ana@explora.co", "clave", false);
    let portal = TestPortal::start(&api).await;

    portal.login("ana@explora.co", "clave").await;
    assert_eq!(portal.get("/tickets").await.status(), StatusCode::OK);

    let response = portal.post_form("/logout", &[]).await;
    assert_eq!(location(&response), "/");
    assert_eq!(location(&portal.get("/tickets").await), "/");
}

#[tokio::test]
async fn test_health_and_security_headers() {
    let api = MockApi::start().await;
    let portal = TestPortal::start(&api).await;

    let response = portal.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let api = MockApi::start().await;
    let portal = TestPortal::start(&api).await;

    let response = portal.get("/no-existe").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.text().await.unwrap(), "Página no encontrada");
}
