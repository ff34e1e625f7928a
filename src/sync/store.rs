use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::TransportError;

/// Somewhere a serialized [`GlobalState`](crate::models::GlobalState) can be kept.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// The stored blob, or `None` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<String>, TransportError>;

    /// Overwrite the stored blob.
    async fn store(&self, blob: &str) -> Result<(), TransportError>;
}

/// Key-value blob behind a single URL: `GET` loads, `PUT` stores.
pub struct HttpStore {
    client: Client,
    url: String,
    token: Option<String>,
}

impl HttpStore {
    pub fn new(url: String, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            url,
            token,
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn load(&self) -> Result<Option<String>, TransportError> {
        let response = self.authorized(self.client.get(&self.url)).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => Ok(None),
            status if status.is_success() => {
                let body = response.text().await?;
                Ok(Some(body).filter(|b| !b.trim().is_empty()))
            }
            status => Err(TransportError::Api(format!("cloud load returned {}", status))),
        }
    }

    async fn store(&self, blob: &str) -> Result<(), TransportError> {
        let response = self
            .authorized(self.client.put(&self.url))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(blob.to_string())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TransportError::Api(format!("cloud store returned {}", response.status())));
        }
        Ok(())
    }
}

/// JSON snapshot on local disk. Writes go to a sibling temp file first and are renamed
/// into place, so a crash never leaves a half-written snapshot behind.
pub struct FileStore {
    path: PathBuf,
    writes: AtomicU64,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            writes: AtomicU64::new(0),
        }
    }

    /// Unique per write, so overlapping writes never share a temp file.
    fn temp_path(&self) -> PathBuf {
        let n = self.writes.fetch_add(1, Ordering::Relaxed);
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(format!(".{}.{}.tmp", std::process::id(), n));
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl RemoteStore for FileStore {
    async fn load(&self) -> Result<Option<String>, TransportError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, blob: &str) -> Result<(), TransportError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, blob).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
