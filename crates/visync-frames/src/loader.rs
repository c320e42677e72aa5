use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::{
    AssetRef,
    error::{AssetError, Result},
    http_client::http_client,
};

/// Checks that a frame asset can actually be displayed
#[async_trait]
pub trait AssetLoader: Send + Sync {
    async fn load(&self, asset: &AssetRef) -> Result<()>;
}

/// Loads remote frames over HTTP and local frames from disk
pub struct HttpAssetLoader {
    client: Client,
}

impl HttpAssetLoader {
    pub fn new() -> Self {
        Self { client: http_client() }
    }

    async fn load_remote(&self, url: &str) -> Result<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AssetError::Unreachable(format!("{url}: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AssetError::NotFound(url.to_owned()));
        }
        if !status.is_success() {
            return Err(AssetError::Unreachable(format!("{url}: status {status}")));
        }

        let content_type = response
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase);

        if let Some(content_type) = content_type
            && !content_type.starts_with("image/")
        {
            return Err(AssetError::InvalidAsset(format!("{url}: {content_type}")));
        }

        Ok(())
    }
}

impl Default for HttpAssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetLoader for HttpAssetLoader {
    async fn load(&self, asset: &AssetRef) -> Result<()> {
        match asset {
            AssetRef::Remote(url) => self.load_remote(url).await,
            AssetRef::Local(path) => match tokio::fs::metadata(path).await {
                Ok(meta) if meta.is_file() => Ok(()),
                _ => Err(AssetError::NotFound(path.display().to_string())),
            },
        }
    }
}
