//! End-user ticket view: own tickets, status filter, new ticket form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use ticket_portal_core::{StatusFilter, Ticket, UserId};

use crate::api::{ApiError, TicketApiClient};
use crate::middleware::RequireUser;
use crate::models::{CurrentUser, OTHER_CATEGORY, TICKET_CATEGORIES, TicketForm};
use crate::state::AppState;
use crate::views::{FilterOption, Notice, ShellView, TicketRow, filter_options};

/// Query parameters of the ticket view.
#[derive(Debug, Default, Deserialize)]
pub struct TicketsQuery {
    pub status: Option<String>,
    pub notice: Option<String>,
}

/// One option of the category dropdown.
pub struct CategoryOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Ticket view template.
#[derive(Template, WebTemplate)]
#[template(path = "tickets/index.html")]
pub struct TicketsTemplate {
    pub shell: ShellView,
    pub filters: Vec<FilterOption>,
    pub tickets: Vec<TicketRow>,
    pub notice: Option<Notice>,
    pub error: Option<String>,
    pub categories: Vec<CategoryOption>,
    pub custom_title: String,
    pub description: String,
    /// Active filter, posted back with the new ticket form.
    pub status_filter: &'static str,
}

impl TicketsTemplate {
    fn new(state: &AppState, user: &CurrentUser, tickets: &[Ticket], filter: StatusFilter) -> Self {
        Self {
            shell: ShellView::new(&state.config().shell, Some(user.email.as_str())),
            filters: filter_options(filter),
            tickets: filter.apply(tickets).map(TicketRow::from).collect(),
            notice: None,
            error: None,
            categories: category_options(&TicketForm::default()),
            custom_title: String::new(),
            description: String::new(),
            status_filter: filter.as_str(),
        }
    }

    /// Keep the submitted values in the form.
    fn with_form(mut self, form: &TicketForm) -> Self {
        self.categories = category_options(form);
        self.custom_title.clone_from(&form.custom_title);
        self.description.clone_from(&form.description);
        self
    }
}

/// Category dropdown with the form's choice selected. The first category is
/// selected when nothing was chosen yet.
fn category_options(form: &TicketForm) -> Vec<CategoryOption> {
    let chosen = if form.category.is_empty() {
        TICKET_CATEGORIES[0]
    } else {
        form.category.as_str()
    };

    TICKET_CATEGORIES
        .iter()
        .map(|category| CategoryOption {
            value: category,
            label: category,
            selected: *category == chosen,
        })
        .chain(std::iter::once(CategoryOption {
            value: OTHER_CATEGORY,
            label: "Otro",
            selected: chosen == OTHER_CATEGORY,
        }))
        .collect()
}

/// Ticket view path showing `filter`.
fn tickets_path(filter: StatusFilter) -> String {
    match filter {
        StatusFilter::All => "/tickets".to_string(),
        other => format!("/tickets?status={}", other.as_str()),
    }
}

/// Fetch the user's tickets. Failures render as an empty list.
async fn load_tickets(api: &TicketApiClient, user_id: &UserId) -> Vec<Ticket> {
    api.user_tickets(user_id).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load tickets, showing none");
        Vec::new()
    })
}

/// Display the user's tickets.
#[instrument(skip(state, user, query), fields(user_id = %user.user_id))]
pub async fn index(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<TicketsQuery>,
) -> impl IntoResponse {
    let filter = StatusFilter::from_query(query.status.as_deref());
    let tickets = load_tickets(state.api(), &user.user_id).await;

    let mut page = TicketsTemplate::new(&state, &user, &tickets, filter);
    page.notice = Notice::from_query(query.notice.as_deref());
    page
}

/// Handle the new ticket form.
///
/// Invalid input is reported without calling the API. On success the browser
/// is redirected back to the (reset) view. Either way the list keeps the
/// filter it was showing.
#[instrument(skip(state, user, form), fields(user_id = %user.user_id))]
pub async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(form): Form<TicketForm>,
) -> Response {
    let filter = StatusFilter::from_query(Some(form.status.as_str()));
    let error = match form.validate(&user.user_id) {
        Ok(ticket) => match state.api().create_ticket(&ticket).await {
            Ok(()) => {
                tracing::info!(title = %ticket.title, "Ticket created");
                let path = Notice::TicketCreated.redirect_path(&tickets_path(filter));
                return Redirect::to(&path).into_response();
            }
            Err(ApiError::Rejected { message, .. }) => {
                message.unwrap_or_else(|| "Error creando el ticket".to_string())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ticket creation failed");
                "Error al conectar con el servidor".to_string()
            }
        },
        Err(e) => e.user_message().to_string(),
    };

    let tickets = load_tickets(state.api(), &user.user_id).await;
    let mut page = TicketsTemplate::new(&state, &user, &tickets, filter).with_form(&form);
    page.error = Some(error);
    page.into_response()
}
