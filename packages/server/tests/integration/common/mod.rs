use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tempfile::TempDir;

use comics_server::accounts::MemoryAccountStore;
use comics_server::catalog::{CatalogService, MemoryCatalogStore};
use comics_server::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig, StorageConfig,
};
use comics_server::state::AppState;
use ::common::storage::FilesystemMediaStore;

/// Largest image the test server accepts.
pub const MAX_IMAGE_SIZE: u64 = 64 * 1024;

pub const COVER_BYTES: &[u8] = b"\xff\xd8\xff\xe0cover-bytes";
pub const BANNER_BYTES: &[u8] = b"\xff\xd8\xff\xe0banner-bytes";

pub mod routes {
    pub const REGISTER: &str = "/api/v1/auth/register";
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const PROFILE: &str = "/api/v1/auth/profile";
    pub const COMICS: &str = "/api/v1/comics";
    pub const COMIC_INFO: &str = "/api/v1/comics/info";

    pub fn comic(alternative_name: &str) -> String {
        format!("/api/v1/comics/{alternative_name}")
    }

    pub fn comic_cover(alternative_name: &str) -> String {
        format!("/api/v1/comics/{alternative_name}/cover")
    }

    pub fn comic_banner(alternative_name: &str) -> String {
        format!("/api/v1/comics/{alternative_name}/banner")
    }
}

/// A running test server backed by in-memory stores and a temporary media root.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub catalog: Arc<MemoryCatalogStore>,
    media_dir: TempDir,
    _upload_dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

/// Text fields of a valid create form.
pub fn comic_fields(name: &str, alternative_name: &str) -> Vec<(&'static str, String)> {
    vec![
        ("name", name.to_string()),
        ("alternative_name", alternative_name.to_string()),
        ("description", "A story told at midnight".to_string()),
        ("rating", "8.5".to_string()),
        ("type_comics", "Manga".to_string()),
        ("author", "Author".to_string()),
        ("original_author", "Artist".to_string()),
        ("year", "2021".to_string()),
        ("pegi", "16+".to_string()),
        ("status", "В процессе".to_string()),
        ("transfer_status", "В процессе".to_string()),
        ("tags", "night".to_string()),
        ("tags", "city".to_string()),
        ("genres", "drama".to_string()),
    ]
}

/// Build a multipart form from text fields and optional images.
pub fn comic_form(
    fields: &[(&'static str, String)],
    cover: Option<&[u8]>,
    banner: Option<&[u8]>,
) -> Form {
    let mut form = fields
        .iter()
        .fold(Form::new(), |form, (name, value)| {
            form.text(*name, value.clone())
        });
    if let Some(bytes) = cover {
        form = form.part("image_path", image_part(bytes, "cover.jpg"));
    }
    if let Some(bytes) = banner {
        form = form.part("banner_path", image_part(bytes, "banner.jpg"));
    }
    form
}

fn image_part(bytes: &[u8], file_name: &str) -> Part {
    Part::bytes(bytes.to_vec())
        .file_name(file_name.to_string())
        .mime_str("image/jpeg")
        .expect("Failed to set MIME type")
}

impl TestApp {
    pub async fn spawn() -> Self {
        let media_dir = TempDir::new().expect("Failed to create media root");
        let upload_dir = TempDir::new().expect("Failed to create upload dir");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: "postgres://unused".to_string(),
            },
            auth: AuthConfig {
                jwt_secret: "test-secret-for-integration-tests".to_string(),
                token_ttl_days: 1,
            },
            storage: StorageConfig {
                media_root: media_dir.path().to_path_buf(),
                max_image_size: MAX_IMAGE_SIZE,
                upload_dir: upload_dir.path().to_path_buf(),
            },
        };

        let media = FilesystemMediaStore::new(media_dir.path().to_path_buf(), MAX_IMAGE_SIZE)
            .await
            .expect("Failed to initialize media store");
        let catalog = Arc::new(MemoryCatalogStore::new());

        let state = AppState {
            config: app_config,
            catalog: CatalogService::new(catalog.clone(), Arc::new(media)),
            accounts: Arc::new(MemoryAccountStore::new()),
        };

        let app = comics_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            catalog,
            media_dir,
            _upload_dir: upload_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Absolute path of `relative` under the media root.
    pub fn media_path(&self, relative: &str) -> PathBuf {
        self.media_dir.path().join(relative)
    }

    pub fn media_root(&self) -> &Path {
        self.media_dir.path()
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_query(&self, path: &str, query: &[(&str, &str)]) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// GET returning raw bytes and the content type.
    pub async fn get_bytes(&self, path: &str) -> (u16, Option<String>, Vec<u8>) {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = res.bytes().await.unwrap_or_default().to_vec();
        (status, content_type, bytes)
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    pub async fn post_multipart(&self, path: &str, form: Form, token: Option<&str>) -> TestResponse {
        let mut req = self.client.post(self.url(path)).multipart(form);
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        let res = req
            .send()
            .await
            .expect("Failed to send multipart POST request");

        TestResponse::from_response(res).await
    }

    pub async fn patch_multipart(&self, path: &str, form: Form, token: &str) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart PATCH request");

        TestResponse::from_response(res).await
    }

    /// Register a user and log in, returning the auth token.
    pub async fn create_authenticated_user(&self, username: &str, password: &str) -> String {
        let email = format!("{username}@example.com");

        let reg = self
            .post_without_token(
                routes::REGISTER,
                &serde_json::json!({
                    "email": email,
                    "username": username,
                    "password": password,
                }),
            )
            .await;
        assert_eq!(reg.status, 201, "Registration failed: {}", reg.text);

        let res = self
            .post_without_token(
                routes::LOGIN,
                &serde_json::json!({"email": email, "password": password}),
            )
            .await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }

    /// Create an entry with the standard test images and return the response.
    pub async fn create_comic(
        &self,
        token: &str,
        name: &str,
        alternative_name: &str,
    ) -> TestResponse {
        let form = comic_form(
            &comic_fields(name, alternative_name),
            Some(COVER_BYTES),
            Some(BANNER_BYTES),
        );
        self.post_multipart(routes::COMICS, form, Some(token)).await
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }
}
