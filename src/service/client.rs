/// HTTP client for the fitting inference service
///
/// Thin typed wrappers over the service's multipart endpoints. The client
/// never retries; every call either yields a domain value or a single
/// `ServiceError` with a readable message.
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::wire::{
    BackgroundRemoval, ComposeResponse, CompositeResult, DressListResponse, SegmentResponse,
};
use crate::config::ApiConfig;
use crate::error::{ConfigError, Operation, ServiceError};
use crate::state::data::{CatalogItem, UploadedAsset};

/// Second input of an automatic match
#[derive(Debug, Clone)]
pub enum DressRef {
    /// Already a local image
    Asset(UploadedAsset),
    /// Catalog entry; its image is downloaded before submission
    Catalog(CatalogItem),
}

/// Error body shapes the backend uses on non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    detail: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Client,
    /// Base URL without a trailing slash
    base_url: String,
}

impl ServiceClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        Url::parse(&config.base_url).map_err(|e| {
            ConfigError::Invalid(format!("invalid API base URL '{}': {}", config.base_url, e))
        })?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a backend path such as `/api/segment`
    fn endpoint(&self, operation: Operation, path: &str) -> Result<Url, ServiceError> {
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{}/{}", self.base_url, path))
            .map_err(|e| ServiceError::new(operation, format!("invalid URL: {e}")))
    }

    /// Catalog image references may be absolute or relative to the backend
    pub fn resolve_image_ref(&self, image_ref: &str) -> Result<Url, ServiceError> {
        match Url::parse(image_ref) {
            Ok(url) => Ok(url),
            Err(_) => self.endpoint(Operation::FetchDressImage, image_ref),
        }
    }

    /// Compose a person photo with a dress, downloading the dress first
    /// when it is a catalog entry.
    pub async fn match_automatic(
        &self,
        person: UploadedAsset,
        dress: DressRef,
    ) -> Result<CompositeResult, ServiceError> {
        let dress = match dress {
            DressRef::Asset(asset) => asset,
            DressRef::Catalog(item) => self
                .fetch_dress_image(&item)
                .await
                .map_err(|e| ServiceError::new(Operation::Match, e.message))?,
        };

        log::info!("🪄 Automatic match: person={:?} dress={:?}", person.id(), dress.id());
        self.compose(person, dress).await
    }

    /// Compose two local images
    pub async fn match_custom(
        &self,
        full_body: UploadedAsset,
        dress: UploadedAsset,
    ) -> Result<CompositeResult, ServiceError> {
        log::info!("🪄 Custom match: person={:?} dress={:?}", full_body.id(), dress.id());
        self.compose(full_body, dress).await
    }

    async fn compose(
        &self,
        person: UploadedAsset,
        dress: UploadedAsset,
    ) -> Result<CompositeResult, ServiceError> {
        let op = Operation::Match;
        let form = Form::new()
            .part("person_image", asset_part(op, &person, "person.jpg")?)
            .part("dress_image", asset_part(op, &dress, "dress.jpg")?);

        let response = self
            .http
            .post(self.endpoint(op, "/api/compose-dress")?)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ServiceError::transport(op, e))?;

        read_json::<ComposeResponse>(op, response).await?.into_result()
    }

    /// Strip the background from a dress image
    pub async fn remove_background(
        &self,
        dress: UploadedAsset,
    ) -> Result<BackgroundRemoval, ServiceError> {
        let op = Operation::RemoveBackground;
        log::info!("✂️  Removing background: {:?}", dress.id());

        let form = Form::new().part("file", asset_part(op, &dress, "dress.jpg")?);
        let response = self
            .http
            .post(self.endpoint(op, "/api/segment")?)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ServiceError::transport(op, e))?;

        let removal = read_json::<SegmentResponse>(op, response).await?.into_removal()?;
        if let Some(ratio) = removal.detection_ratio {
            log::debug!("Dress area detected: {:.2}%", ratio);
        }
        Ok(removal)
    }

    pub async fn list_catalog(&self) -> Result<Vec<CatalogItem>, ServiceError> {
        let op = Operation::ListCatalog;
        let response = self
            .http
            .get(self.endpoint(op, "/api/admin/dresses")?)
            .send()
            .await
            .map_err(|e| ServiceError::transport(op, e))?;

        let items = read_json::<DressListResponse>(op, response).await?.into_items()?;
        log::info!("📚 Loaded {} catalog items", items.len());
        Ok(items)
    }

    pub async fn health(&self) -> Result<serde_json::Value, ServiceError> {
        let op = Operation::Health;
        let response = self
            .http
            .get(self.endpoint(op, "/health")?)
            .send()
            .await
            .map_err(|e| ServiceError::transport(op, e))?;
        read_json(op, response).await
    }

    /// Download a catalog image into a local asset named `dress_{id}.jpg`
    pub async fn fetch_dress_image(&self, item: &CatalogItem) -> Result<UploadedAsset, ServiceError> {
        let op = Operation::FetchDressImage;
        let url = self.resolve_image_ref(&item.image_ref)?;
        log::debug!("Fetching dress image {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ServiceError::transport(op, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::new(op, format!("HTTP {status}")));
        }

        let header_mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| v.starts_with("image/"));

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ServiceError::transport(op, e))?;

        let mime = header_mime.unwrap_or_else(|| {
            image::guess_format(&bytes)
                .map(|f| f.to_mime_type().to_string())
                .unwrap_or_else(|_| "image/jpeg".to_string())
        });

        Ok(UploadedAsset::new(
            bytes.to_vec(),
            mime,
            Some(format!("dress_{}.jpg", item.id)),
        ))
    }
}

fn asset_part(op: Operation, asset: &UploadedAsset, fallback: &str) -> Result<Part, ServiceError> {
    Part::bytes(asset.bytes.to_vec())
        .file_name(asset.upload_name(fallback))
        .mime_str(&asset.mime)
        .map_err(|e| ServiceError::transport(op, e))
}

/// Decode a JSON body, folding non-2xx statuses into `ServiceError`
async fn read_json<T: DeserializeOwned>(
    op: Operation,
    response: Response,
) -> Result<T, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| {
                body.message.or(match body.detail {
                    Some(serde_json::Value::String(s)) => Some(s),
                    Some(other) => Some(other.to_string()),
                    None => None,
                })
            })
            .unwrap_or_else(|| format!("HTTP {status}"));
        log::warn!("⚠️  {} returned {}: {}", op, status, message);
        return Err(ServiceError::new(op, message));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ServiceError::transport(op, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use crate::state::data::Category;

    /// One canned HTTP response
    struct Canned {
        status: &'static str,
        content_type: &'static str,
        body: &'static [u8],
    }

    fn json(status: &'static str, body: &'static str) -> Canned {
        Canned {
            status,
            content_type: "application/json",
            body: body.as_bytes(),
        }
    }

    /// Serve the responses in order, one connection each; resolves to the
    /// raw request texts.
    async fn serve(responses: Vec<Canned>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for canned in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let request = read_request(&mut socket).await;

                let head = format!(
                    "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    canned.status,
                    canned.content_type,
                    canned.body.len()
                );
                socket.write_all(head.as_bytes()).await.unwrap();
                socket.write_all(canned.body).await.unwrap();
                socket.shutdown().await.ok();
                requests.push(request);
            }
            requests
        });

        (format!("http://{}", addr), handle)
    }

    /// Serve exactly one JSON response; resolves to the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let (base, server) = serve(vec![json(status, body)]).await;
        let handle = tokio::spawn(async move { server.await.unwrap().remove(0) });
        (base, handle)
    }

    /// Read the head, then as much body as Content-Length announces
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut request = Vec::new();
        let mut buf = [0u8; 8192];

        let head_end = loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break request.len();
            }
            request.extend_from_slice(&buf[..n]);
            if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&request[..head_end]).to_lowercase();
        let content_length = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while request.len() < head_end + content_length {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        String::from_utf8_lossy(&request).into_owned()
    }

    fn catalog_item(id: i64, image_ref: &str) -> CatalogItem {
        CatalogItem {
            id,
            display_name: format!("dress_{id}"),
            image_ref: image_ref.to_string(),
            category: Category::Mermaid,
            description: String::new(),
        }
    }

    fn client_for(base_url: &str) -> ServiceClient {
        ServiceClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            timeout: None,
        })
        .unwrap()
    }

    #[test]
    fn test_resolve_image_ref() {
        let client = client_for("http://localhost:8000/");
        assert_eq!(
            client.resolve_image_ref("/images/a.jpg").unwrap().as_str(),
            "http://localhost:8000/images/a.jpg"
        );
        assert_eq!(
            client
                .resolve_image_ref("https://cdn.example.com/d/1.jpg")
                .unwrap()
                .as_str(),
            "https://cdn.example.com/d/1.jpg"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let result = ServiceClient::new(&ApiConfig {
            base_url: "localhost without scheme".into(),
            timeout: None,
        });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_catalog_over_http() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"success":true,"data":[{"id":1,"image_name":"aline_01.jpg","style":"A라인"}]}"#,
        )
        .await;

        let items = client_for(&base).list_catalog().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].display_name, "aline_01");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/admin/dresses "));
    }

    #[tokio::test]
    async fn test_non_success_status_uses_detail() {
        let (base, _server) =
            serve_once("500 Internal Server Error", r#"{"detail":"model not loaded"}"#).await;

        let err = client_for(&base).health().await.unwrap_err();
        assert_eq!(err.operation, Operation::Health);
        assert_eq!(err.message, "model not loaded");
    }

    #[tokio::test]
    async fn test_match_custom_sends_both_parts() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"success":true,"result_image":"data:image/png;base64,AQID","message":"이미지 합성이 완료되었습니다."}"#,
        )
        .await;

        let person = UploadedAsset::new(vec![1u8, 2, 3], "image/jpeg", Some("me.jpg".into()));
        let dress = UploadedAsset::new(vec![4u8, 5, 6], "image/png", None);
        let result = client_for(&base).match_custom(person, dress).await.unwrap();
        assert_eq!(result.image.image.mime, "image/png");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/compose-dress "));
        assert!(request.contains("name=\"person_image\"; filename=\"me.jpg\""));
        assert!(request.contains("name=\"dress_image\"; filename=\"dress.jpg\""));
    }

    #[tokio::test]
    async fn test_success_false_is_a_failure() {
        let (base, _server) =
            serve_once("200 OK", r#"{"success":false,"message":"드레스를 찾지 못했습니다"}"#).await;

        let dress = UploadedAsset::new(vec![9u8], "image/jpeg", None);
        let err = client_for(&base).remove_background(dress).await.unwrap_err();
        assert_eq!(err.operation, Operation::RemoveBackground);
        assert_eq!(err.message, "드레스를 찾지 못했습니다");
    }

    #[tokio::test]
    async fn test_match_automatic_downloads_catalog_dress() {
        let (base, server) = serve(vec![
            Canned {
                status: "200 OK",
                content_type: "image/webp",
                body: b"RIFF\x00\x00\x00\x00WEBP",
            },
            json(
                "200 OK",
                r#"{"success":true,"result_image":"data:image/jpeg;base64,/9j/"}"#,
            ),
        ])
        .await;

        let person = UploadedAsset::new(vec![1u8, 2, 3], "image/png", Some("me.png".into()));
        let result = client_for(&base)
            .match_automatic(person, DressRef::Catalog(catalog_item(7, "/images/x 1.jpg")))
            .await
            .unwrap();
        assert_eq!(result.image.extension(), "jpg");

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].starts_with("GET /images/x%201.jpg "));
        assert!(requests[1].starts_with("POST /api/compose-dress "));
        assert!(requests[1].contains("name=\"dress_image\"; filename=\"dress_7.jpg\""));
        assert!(requests[1].to_lowercase().contains("content-type: image/webp"));
    }

    #[tokio::test]
    async fn test_missing_catalog_image_fails_the_match() {
        let (base, server) = serve(vec![json("404 Not Found", r#"{"detail":"Not Found"}"#)]).await;

        let person = UploadedAsset::new(vec![1u8], "image/jpeg", None);
        let err = client_for(&base)
            .match_automatic(person, DressRef::Catalog(catalog_item(3, "/images/gone.jpg")))
            .await
            .unwrap_err();
        assert_eq!(err.operation, Operation::Match);
        assert!(err.message.contains("404"));

        // The compose request is never sent
        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].starts_with("GET /images/gone.jpg "));
    }

    #[tokio::test]
    async fn test_match_automatic_with_local_dress_skips_download() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"success":true,"result_image":"data:image/png;base64,AQID"}"#,
        )
        .await;

        let person = UploadedAsset::new(vec![1u8], "image/jpeg", None);
        let dress = UploadedAsset::new(vec![2u8], "image/jpeg", Some("dress_5.jpg".into()));
        client_for(&base)
            .match_automatic(person, DressRef::Asset(dress))
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/compose-dress "));
        assert!(request.contains("name=\"person_image\"; filename=\"person.jpg\""));
        assert!(request.contains("name=\"dress_image\"; filename=\"dress_5.jpg\""));
    }
}
