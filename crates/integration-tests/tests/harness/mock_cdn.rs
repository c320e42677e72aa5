//! Mock avatar asset origin
//!
//! Serves a fixed set of image paths; everything else is 404.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::IntoResponse;
use axum::Router;
use tokio_util::sync::CancellationToken;
use visync_core::VisemeSet;

/// 1x1 transparent PNG
const PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00,
    0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49,
    0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00,
    0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

pub struct MockCdn {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockCdnState>,
}

struct MockCdnState {
    served: HashSet<String>,
    request_count: AtomicU32,
}

impl MockCdn {
    /// Serve exactly `paths`
    pub async fn start(paths: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let state = Arc::new(MockCdnState {
            served: paths.into_iter().collect(),
            request_count: AtomicU32::new(0),
        });

        let app = Router::new().fallback(handle_asset).with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Probe frame plus a full frame for every viseme of `set`
    pub async fn start_with_speaker(speaker: &str, set: VisemeSet) -> anyhow::Result<Self> {
        let frames = set.visemes().map(|v| format!("/avatars/{speaker}/full/{v}.png"));
        let probe = format!("/avatars/{speaker}/full/REST/frame_01.webp");
        Self::start(frames.chain([probe])).await
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockCdn {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_asset(State(state): State<Arc<MockCdnState>>, uri: Uri) -> impl IntoResponse {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    if state.served.contains(uri.path()) {
        ([(header::CONTENT_TYPE, "image/png")], PNG).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}
