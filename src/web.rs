// Browser UI server.
//
// Three routes glue the pieces together: `GET /` serves the page,
// `GET /api/media` lists the media library and `POST /upload` removes the
// background of an uploaded image and publishes it. The blocking work of
// each request runs on its own blocking thread; requests share nothing
// mutable.

use crate::api::{FloridayClient, MediaItem};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::magic_wand::{remove_background, transparent_output_path, BackgroundRemover};
use crate::page::render_index_html;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Largest request body accepted on `/upload`.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

const DEFAULT_OUTPUT_DIR: &str = "output";

/// Everything a request needs. Read-only once the server runs.
pub struct AppState {
    pub client_config: ClientConfig,
    pub remover: Arc<dyn BackgroundRemover>,
    /// Where `<temp-stem>-transparent.png` files are written.
    pub output_dir: PathBuf,
    /// Where uploaded images are staged before processing.
    pub temp_dir: PathBuf,
}

impl AppState {
    pub fn new(client_config: ClientConfig, remover: Arc<dyn BackgroundRemover>) -> Self {
        AppState {
            client_config,
            remover,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            temp_dir: std::env::temp_dir(),
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }
}

/// Build the router. Unknown paths and unsupported methods answer 404 JSON.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index).fallback(not_found))
        .route("/api/media", get(list_media).fallback(not_found))
        .route("/upload", post(upload).fallback(not_found))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn html_response(status: StatusCode, html: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
        .into_response()
}

fn json_response(status: StatusCode, payload: &Value) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        payload.to_string(),
    )
        .into_response()
}

async fn index() -> Response {
    html_response(StatusCode::OK, render_index_html(None))
}

async fn not_found() -> Response {
    json_response(StatusCode::NOT_FOUND, &json!({"error": "Not found"}))
}

/// Run blocking work on its own thread and flatten the join error into a
/// displayable message.
async fn run_blocking<T, F>(work: F) -> std::result::Result<T, String>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(format!("interne fout: {e}")),
    }
}

async fn list_media(State(state): State<Arc<AppState>>) -> Response {
    let config = state.client_config.clone();
    match run_blocking(move || FloridayClient::new(config)?.list_media()).await {
        Ok(items) => {
            info!(count = items.len(), "Listed media");
            let items: Vec<Value> = items.into_iter().map(Value::Object).collect();
            json_response(StatusCode::OK, &Value::Array(items))
        }
        Err(message) => {
            warn!(error = %message, "Listing media failed");
            json_response(StatusCode::BAD_GATEWAY, &json!({"error": message}))
        }
    }
}

#[derive(Default)]
struct UploadForm {
    image: Option<Vec<u8>>,
    title: Option<String>,
}

async fn read_upload_form(mut multipart: Multipart) -> std::result::Result<UploadForm, MultipartError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("image") => {
                let has_file = field.file_name().is_some_and(|name| !name.is_empty());
                let bytes = field.bytes().await?;
                if has_file {
                    form.image = Some(bytes.to_vec());
                }
            }
            Some("title") => {
                form.title = Some(field.text().await?);
            }
            _ => continue,
        }
    }
    Ok(form)
}

async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    let form = match multipart {
        Ok(multipart) => match read_upload_form(multipart).await {
            Ok(form) => form,
            Err(e) => {
                warn!(error = %e, "Reading upload form failed");
                return html_response(
                    e.status(),
                    render_index_html(Some(&format!("Upload mislukt: {e}"))),
                );
            }
        },
        // No multipart body at all counts as "no image".
        Err(rejection) => {
            warn!(error = %rejection, "Upload without multipart body");
            UploadForm::default()
        }
    };

    let Some(image) = form.image else {
        return html_response(
            StatusCode::BAD_REQUEST,
            render_index_html(Some("Geen afbeelding geüpload.")),
        );
    };
    let title = form.title.filter(|t| !t.trim().is_empty());
    info!(bytes = image.len(), title = ?title, "Upload received");

    let job_state = Arc::clone(&state);
    let outcome = run_blocking(move || process_upload(&job_state, &image, title.as_deref())).await;
    match outcome {
        Ok(result) => {
            let message = format!("Upload succesvol: {}", Value::Object(result));
            html_response(StatusCode::OK, render_index_html(Some(&message)))
        }
        Err(message) => {
            warn!(error = %message, "Upload failed");
            html_response(
                StatusCode::BAD_GATEWAY,
                render_index_html(Some(&format!("Upload mislukt: {message}"))),
            )
        }
    }
}

/// Stage the image in a temp file, cut it out and upload the result. The
/// temp file is removed when it goes out of scope, on every path.
fn process_upload(state: &AppState, image: &[u8], title: Option<&str>) -> Result<MediaItem> {
    let mut staged = tempfile::Builder::new()
        .prefix("magic-wand-")
        .suffix(".upload")
        .tempfile_in(&state.temp_dir)?;
    staged.write_all(image)?;
    staged.flush()?;

    let output = transparent_output_path(&state.output_dir, staged.path());
    let cleaned = remove_background(state.remover.as_ref(), staged.path(), &output)?;
    let client = FloridayClient::new(state.client_config.clone())?;
    client.upload_media(&cleaned, title, None)
}
