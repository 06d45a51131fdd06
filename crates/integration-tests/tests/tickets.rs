//! End-user ticket view: listing, filtering and creating tickets.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::json;

use ticket_portal_integration_tests::{MockApi, TestPortal, location};

/// Start both servers and log in a regular user. Returns the user's ID.
async fn logged_in_user() -> (MockApi, TestPortal, String) {
    let api = MockApi::start().await;
    let user_id = api.add_user("ana@explora.co", "clave", false);
    let portal = TestPortal::start(&api).await;
    let response = portal.login("ana@explora.co", "clave").await;
    assert_eq!(location(&response), "/tickets");
    api.clear_calls();
    (api, portal, user_id)
}

#[tokio::test]
async fn test_ticket_view_requires_session() {
    let api = MockApi::start().await;
    let portal = TestPortal::start(&api).await;

    assert_eq!(location(&portal.get("/tickets").await), "/");
    assert_eq!(location(&portal.get("/tickets-admin").await), "/");
    let create = portal
        .post_form("/tickets", &[("category", "Problemas de red"), ("description", "x")])
        .await;
    assert_eq!(location(&create), "/");

    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_lists_own_tickets_only() {
    let (api, portal, user_id) = logged_in_user().await;
    let other = api.add_user("otro@explora.co", "clave", false);
    api.add_ticket(&user_id, "Wifi del piso 3", "open");
    api.add_ticket(&other, "Ticket ajeno", "open");

    let body = portal.get("/tickets").await.text().await.unwrap();
    assert!(body.contains("Wifi del piso 3"));
    assert!(!body.contains("Ticket ajeno"));
    assert!(body.contains(r#"<span class="badge badge-open">Abierto</span>"#));
    assert_eq!(api.count("GET", &format!("/users/{user_id}/tickets")), 1);
}

#[tokio::test]
async fn test_null_ticket_list_renders_empty_without_error() {
    let (api, portal, _) = logged_in_user().await;
    api.set_tickets_payload(json!({ "tickets": null }));

    let response = portal.get("/tickets").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("No hay tickets para este filtro"));
    assert!(!body.contains("notice-error"));
}

#[tokio::test]
async fn test_malformed_ticket_list_renders_empty() {
    let (api, portal, _) = logged_in_user().await;
    api.set_tickets_payload(json!({ "tickets": "oops" }));

    let response = portal.get("/tickets").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("No hay tickets para este filtro"));
}

#[tokio::test]
async fn test_undecodable_ticket_does_not_hide_the_others() {
    let (api, portal, _) = logged_in_user().await;
    api.set_tickets_payload(json!({ "tickets": [
        { "ticketId": "t1", "title": "Wifi del piso 3", "status": "open" },
        { "ticketId": "t2", "title": null, "description": "Sin título", "status": "open" },
        { "ticketId": "t3", "title": "Estado raro", "status": 42 }
    ]}));

    let body = portal.get("/tickets").await.text().await.unwrap();
    assert!(body.contains("Wifi del piso 3"));
    assert!(body.contains("Sin título"));
    assert!(!body.contains("Estado raro"));
    assert!(!body.contains("No hay tickets para este filtro"));
}

#[tokio::test]
async fn test_status_filter_is_applied_locally() {
    let (api, portal, user_id) = logged_in_user().await;
    api.add_ticket(&user_id, "Servidor caído", "open");
    api.add_ticket(&user_id, "Clave olvidada", "CLOSED");
    api.add_ticket(&user_id, "Red lenta", "closed");

    let open = portal.get("/tickets?status=open").await.text().await.unwrap();
    assert!(open.contains("Servidor caído"));
    assert!(!open.contains("Clave olvidada"));
    assert!(!open.contains("Red lenta"));

    let closed = portal.get("/tickets?status=closed").await.text().await.unwrap();
    assert!(!closed.contains("Servidor caído"));
    assert!(closed.contains("Clave olvidada"));
    assert!(closed.contains("Red lenta"));

    let all = portal.get("/tickets?status=whatever").await.text().await.unwrap();
    assert!(all.contains("Servidor caído"));
    assert!(all.contains("Red lenta"));

    // The filter never reaches the API.
    assert!(api.calls().iter().all(|c| !c.path.contains("status")));
}

#[tokio::test]
async fn test_empty_filter_result_message() {
    let (api, portal, user_id) = logged_in_user().await;
    api.add_ticket(&user_id, "Servidor caído", "open");

    let body = portal.get("/tickets?status=closed").await.text().await.unwrap();
    assert!(body.contains("No hay tickets para este filtro"));
}

#[tokio::test]
async fn test_create_ticket_with_category() {
    let (api, portal, user_id) = logged_in_user().await;

    let response = portal
        .post_form(
            "/tickets",
            &[
                ("category", "Problemas de software"),
                ("custom_title", ""),
                ("description", "Excel no abre"),
            ],
        )
        .await;
    assert_eq!(location(&response), "/tickets?notice=ticket_created");

    let calls = api.calls();
    let create: Vec<_> = calls.iter().filter(|c| c.path == "/ticket").collect();
    assert_eq!(create.len(), 1);
    assert_eq!(
        create[0].body,
        json!({
            "title": "Problemas de software",
            "description": "Excel no abre",
            "userId": user_id,
        })
    );

    let body = portal
        .get("/tickets?notice=ticket_created")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Ticket creado"));
    assert!(body.contains("Excel no abre"));
}

#[tokio::test]
async fn test_create_ticket_with_custom_title() {
    let (api, portal, _) = logged_in_user().await;

    portal
        .post_form(
            "/tickets",
            &[
                ("category", "otro"),
                ("custom_title", "  Impresora atascada  "),
                ("description", "Piso 2"),
            ],
        )
        .await;

    let calls = api.calls();
    let create = calls.iter().find(|c| c.path == "/ticket").unwrap();
    assert_eq!(create.body["title"], "Impresora atascada");
}

#[tokio::test]
async fn test_blank_custom_title_never_posts() {
    let (api, portal, _) = logged_in_user().await;

    let response = portal
        .post_form(
            "/tickets",
            &[
                ("category", "otro"),
                ("custom_title", "   "),
                ("description", "Algo pasa"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Debes ingresar un título"));
    // Submitted values stay in the form.
    assert!(body.contains("Algo pasa"));

    assert_eq!(api.count("POST", "/ticket"), 0);
}

#[tokio::test]
async fn test_blank_description_never_posts() {
    let (api, portal, _) = logged_in_user().await;

    let body = portal
        .post_form(
            "/tickets",
            &[("category", "Problemas de red"), ("description", "  ")],
        )
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Debes ingresar una descripción"));
    assert_eq!(api.count("POST", "/ticket"), 0);
}

#[tokio::test]
async fn test_create_failure_shows_server_error() {
    let (api, portal, _) = logged_in_user().await;
    api.fail_ticket_creation(
        StatusCode::BAD_REQUEST,
        json!({ "error": "Título demasiado largo" }),
    );

    let response = portal
        .post_form(
            "/tickets",
            &[("category", "Problemas de red"), ("description", "Sin wifi")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Título demasiado largo"));
    assert!(body.contains("Sin wifi"));
}

#[tokio::test]
async fn test_create_failure_without_body_shows_fallback() {
    let (api, portal, _) = logged_in_user().await;
    api.fail_ticket_creation(StatusCode::INTERNAL_SERVER_ERROR, json!({}));

    let body = portal
        .post_form(
            "/tickets",
            &[("category", "Problemas de red"), ("description", "Sin wifi")],
        )
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Error creando el ticket"));
}

#[tokio::test]
async fn test_create_failure_with_blank_error_shows_fallback() {
    let (api, portal, _) = logged_in_user().await;
    api.fail_ticket_creation(StatusCode::BAD_REQUEST, json!({ "error": "" }));

    let body = portal
        .post_form(
            "/tickets",
            &[("category", "Problemas de red"), ("description", "Sin wifi")],
        )
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Error creando el ticket"));
    assert!(!body.contains(r#"role="alert"></p>"#));
}

#[tokio::test]
async fn test_create_keeps_active_filter() {
    let (api, portal, user_id) = logged_in_user().await;
    api.add_ticket(&user_id, "Servidor caído", "open");
    api.add_ticket(&user_id, "Clave olvidada", "closed");

    // A failed submission re-renders the filtered list.
    let body = portal
        .post_form(
            "/tickets",
            &[
                ("category", "otro"),
                ("custom_title", ""),
                ("description", "Algo pasa"),
                ("status", "closed"),
            ],
        )
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Clave olvidada"));
    assert!(!body.contains("Servidor caído"));
    assert!(body.contains(r#"<option value="closed" selected>"#));
    assert!(body.contains(r#"<input type="hidden" name="status" value="closed">"#));

    // A successful one comes back to the same filter.
    let response = portal
        .post_form(
            "/tickets",
            &[
                ("category", "Problemas de red"),
                ("description", "Sin wifi"),
                ("status", "closed"),
            ],
        )
        .await;
    assert_eq!(
        location(&response),
        "/tickets?status=closed&notice=ticket_created"
    );
}
