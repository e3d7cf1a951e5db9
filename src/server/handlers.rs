//! Route handlers
//!
//! Store and template work is blocking, so each handler runs it on tokio's
//! blocking pool and only builds the response on the async side.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;

use super::AppState;
use crate::content::{Page, Title};
use crate::error::Result;
use crate::templates::View;

/// Form posted by the edit view
#[derive(Debug, Deserialize)]
pub struct SaveForm {
    #[serde(default)]
    pub body: String,
}

/// `GET /` - every page, rendered
pub async fn home(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    let html = blocking(move || {
        let pages = state.store.list_pages();
        tracing::debug!("Listing {} pages", pages.len());
        state.templates.render_home(&state.site, &pages)
    })
    .await?;

    Ok(Html(html))
}

/// `GET /view/:title` - a rendered page, or a redirect to its edit form
pub async fn view(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> Result<Response> {
    let title = Title::parse(&title)?;
    let edit_url = format!("/edit/{}", title.url_segment());

    let html = blocking(move || match state.store.load_rendered(&title) {
        Ok(page) => state
            .templates
            .render_page(View::Page, &state.site, &page)
            .map(Some),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    })
    .await?;

    match html {
        Some(html) => Ok(Html(html).into_response()),
        None => {
            tracing::debug!("Page missing, redirecting to {}", edit_url);
            Ok(found(edit_url))
        }
    }
}

/// `GET /edit/:title` - edit form with the raw markdown, empty for a new page
pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> Result<Html<String>> {
    let title = Title::parse(&title)?;

    let html = blocking(move || {
        let page = match state.store.load_source(&title) {
            Ok(page) => page,
            Err(e) if e.is_not_found() => Page::empty(title),
            Err(e) => return Err(e),
        };
        state.templates.render_page(View::Edit, &state.site, &page)
    })
    .await?;

    Ok(Html(html))
}

/// `POST /save/:title` - persist the posted markdown, then show the page
pub async fn save(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
    Form(form): Form<SaveForm>,
) -> Result<Response> {
    let title = Title::parse(&title)?;
    let view_url = format!("/view/{}", title.url_segment());

    blocking(move || state.store.save(&title, form.body.as_bytes())).await?;

    Ok(found(view_url))
}

/// `302 Found` redirect
fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}
