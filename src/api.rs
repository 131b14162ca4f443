// API client module: a small blocking HTTP client for the Floriday
// Supplier API media endpoint. It uploads images as multipart/form-data
// and lists what is already in the media library.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::multipart::{self, FilePart};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info, warn};

/// One entry of the media library. Fields are passed through as Floriday
/// returns them.
pub type MediaItem = Map<String, Value>;

/// Floriday media client holding a reqwest blocking client and the
/// configuration it was built from.
#[derive(Clone)]
pub struct FloridayClient {
    client: Client,
    config: ClientConfig,
}

impl FloridayClient {
    /// Build a client. Fails when no API token is configured.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.token.is_empty() {
            return Err(Error::Configuration(
                "FLORIDAY_TOKEN ontbreekt. Zet een geldige API token in je omgeving.".into(),
            ));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(FloridayClient { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Bearer token and JSON accept header sent with every request.
    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {}", self.config.token))
            .map_err(|_| Error::Configuration("FLORIDAY_TOKEN bevat ongeldige tekens.".into()))?;
        headers.insert(AUTHORIZATION, value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Build the multipart body for `file_path` and return it with its
    /// content type. Title comes first, then metadata; a metadata key that
    /// repeats an earlier field replaces that field's value in place.
    pub fn build_multipart_body(
        &self,
        file_path: &Path,
        title: Option<&str>,
        metadata: Option<&Map<String, Value>>,
    ) -> Result<(Vec<u8>, String)> {
        let boundary = multipart::new_boundary();
        let fields = form_fields(title, metadata);
        let file_name = file_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload");
        let bytes = std::fs::read(file_path)?;
        let part = FilePart {
            field_name: "file",
            file_name,
            mime_type: multipart::guess_mime_type(file_path),
            bytes: &bytes,
        };
        let body = multipart::encode(&boundary, &fields, &part);
        Ok((body, multipart::content_type(&boundary)))
    }

    /// Upload an image file to the Floriday media library.
    pub fn upload_media(
        &self,
        image_path: &Path,
        title: Option<&str>,
        metadata: Option<&Map<String, Value>>,
    ) -> Result<MediaItem> {
        if !image_path.exists() {
            return Err(Error::NotFound(image_path.to_path_buf()));
        }

        let (body, content_type) = self.build_multipart_body(image_path, title, metadata)?;
        let url = self.config.media_url();
        info!(url = %url, file = %image_path.display(), bytes = body.len(), "Uploading media");

        let req = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .header(CONTENT_TYPE, content_type)
            .body(body);

        match self.request_json(req)? {
            Value::Object(map) => Ok(map),
            other => {
                let mut wrapped = Map::new();
                wrapped.insert("items".into(), other);
                Ok(wrapped)
            }
        }
    }

    /// List media items. Accepts a bare array or an object with an `items`
    /// array; anything else is an empty library.
    pub fn list_media(&self) -> Result<Vec<MediaItem>> {
        let url = self.config.media_url();
        debug!(url = %url, "Listing media");
        let req = self.client.get(&url).headers(self.auth_headers()?);
        Ok(media_items(self.request_json(req)?))
    }

    /// Send `req` and decode the JSON body. Non-2xx answers become
    /// `Error::RemoteRequest`; an empty body decodes to an empty object.
    fn request_json(&self, req: RequestBuilder) -> Result<Value> {
        let res: Response = req.send()?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            warn!(status = status.as_u16(), "Floriday request failed");
            return Err(Error::RemoteRequest {
                status: status.as_u16(),
                body,
            });
        }

        let raw = res.text()?;
        if raw.is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        Ok(serde_json::from_str(&raw)?)
    }
}

fn form_fields(title: Option<&str>, metadata: Option<&Map<String, Value>>) -> Vec<(String, String)> {
    let mut fields: Vec<(String, String)> = Vec::new();
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        fields.push(("title".into(), title.into()));
    }
    for (key, value) in metadata.into_iter().flatten() {
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        match fields.iter_mut().find(|(name, _)| name == key) {
            Some(existing) => existing.1 = text,
            None => fields.push((key.clone(), text)),
        }
    }
    fields
}

fn media_items(payload: Value) -> Vec<MediaItem> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use tempfile::TempDir;

    const MEDIA_PATH: &str = "/suppliers/v1/media";

    fn client_for(server: &mockito::Server) -> FloridayClient {
        FloridayClient::new(ClientConfig::new(server.url(), "abc")).unwrap()
    }

    fn write_image(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("image.png");
        std::fs::write(&path, b"png").unwrap();
        path
    }

    fn object(value: Value) -> MediaItem {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn empty_token_fails_construction() {
        let err = FloridayClient::new(ClientConfig::new("https://example.com", "")).err();
        assert!(matches!(err, Some(Error::Configuration(_))));
    }

    #[test]
    fn non_empty_token_constructs() {
        let client = FloridayClient::new(ClientConfig::new("https://api.floriday.io/", "abc")).unwrap();
        assert_eq!(
            client.config().media_url(),
            "https://api.floriday.io/suppliers/v1/media"
        );
    }

    #[test]
    fn multipart_body_contains_title_and_file() {
        let dir = TempDir::new().unwrap();
        let image = write_image(&dir);
        let client = FloridayClient::new(ClientConfig::new("https://example.com", "abc")).unwrap();

        let (body, content_type) = client.build_multipart_body(&image, Some("Demo"), None).unwrap();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("name=\"title\""));
        assert!(text.contains("Demo"));
        assert!(text.contains("filename=\"image.png\""));
        assert!(text.contains("png"));
        assert!(content_type.starts_with("multipart/form-data; boundary="));
    }

    #[test]
    fn metadata_fields_follow_title_and_may_replace_it() {
        let metadata = object(json!({"title": "Override", "season": 2024, "tag": "rose"}));
        let fields = form_fields(Some("Demo"), Some(&metadata));
        assert_eq!(fields[0], ("title".to_string(), "Override".to_string()));
        assert!(fields.contains(&("season".to_string(), "2024".to_string())));
        assert!(fields.contains(&("tag".to_string(), "rose".to_string())));
        assert_eq!(fields.len(), 3);

        assert!(form_fields(Some(""), None).is_empty());
    }

    #[test]
    fn upload_media_posts_multipart_with_bearer_token() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", MEDIA_PATH)
            .match_header("authorization", "Bearer abc")
            .match_header("accept", "application/json")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=----FloridayMagicWand[0-9a-f]{32}$".into()),
            )
            .match_body(Matcher::Regex("filename=\"image.png\"".into()))
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"media-1"}"#)
            .create();

        let dir = TempDir::new().unwrap();
        let image = write_image(&dir);
        let result = client_for(&server).upload_media(&image, Some("Demo"), None).unwrap();

        assert_eq!(result, object(json!({"id": "media-1"})));
        mock.assert();
    }

    #[test]
    fn upload_media_wraps_array_and_handles_empty_body() {
        let mut server = mockito::Server::new();
        let dir = TempDir::new().unwrap();
        let image = write_image(&dir);

        let array = server
            .mock("POST", MEDIA_PATH)
            .with_body(r#"[{"id":"1"}]"#)
            .create();
        let result = client_for(&server).upload_media(&image, None, None).unwrap();
        assert_eq!(result, object(json!({"items": [{"id": "1"}]})));
        array.remove();

        server.mock("POST", MEDIA_PATH).with_body("").create();
        let result = client_for(&server).upload_media(&image, None, None).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn upload_media_missing_file_makes_no_request() {
        let mut server = mockito::Server::new();
        let mock = server.mock("POST", MEDIA_PATH).expect(0).create();

        let err = client_for(&server)
            .upload_media(Path::new("/definitely/not/here.png"), None, None)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        mock.assert();
    }

    #[test]
    fn non_success_status_becomes_remote_request_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", MEDIA_PATH)
            .with_status(401)
            .with_body("invalid token")
            .create();

        let err = client_for(&server).list_media().unwrap_err();
        match err {
            Error::RemoteRequest { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid token");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn list_media_supports_items_payload() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", MEDIA_PATH)
            .match_header("authorization", "Bearer abc")
            .with_body(r#"{"items":[{"id":"1","title":"Rose"}]}"#)
            .create();

        let items = client_for(&server).list_media().unwrap();
        assert_eq!(items, vec![object(json!({"id": "1", "title": "Rose"}))]);
        mock.assert();
    }

    #[test]
    fn media_items_filters_shapes() {
        let bare = media_items(json!([{"id": "1"}, 2, "x", {"id": "2"}]));
        assert_eq!(bare, vec![object(json!({"id": "1"})), object(json!({"id": "2"}))]);

        assert!(media_items(json!({"items": "nope"})).is_empty());
        assert!(media_items(json!({"data": []})).is_empty());
        assert!(media_items(json!(42)).is_empty());
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        let client = FloridayClient::new(ClientConfig::new("http://127.0.0.1:1", "abc")).unwrap();
        let err = client.list_media().unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
