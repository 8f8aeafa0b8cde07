//! Development server with live reload support

use std::{convert::Infallible, path::Path, sync::Arc, time::Duration};

use axum::{
    Router,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use tokio::sync::broadcast;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};
use tower_http::{cors::CorsLayer, services::ServeDir};
use vitrine_pipeline::Reload;

/// Live reload message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadMessage {
    /// Full page reload.
    Reload,
    /// Stylesheet swap without a page reload.
    CssReload,
}

impl ReloadMessage {
    /// Message for a watch batch outcome; `None` when nothing visible changed.
    pub fn for_reload(reload: Reload) -> Option<Self> {
        match reload {
            Reload::None => None,
            Reload::Css => Some(Self::CssReload),
            Reload::Full => Some(Self::Reload),
        }
    }

    /// Payload of the server-sent event.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reload => "reload",
            Self::CssReload => "css-reload",
        }
    }
}

/// Server state containing the reload broadcaster.
#[derive(Clone)]
pub struct ServerState {
    /// Broadcast channel for live reload events.
    pub reload_tx: broadcast::Sender<ReloadMessage>,
}

impl ServerState {
    /// Create a new server state.
    pub fn new() -> Self {
        let (reload_tx, _) = broadcast::channel(16);
        Self { reload_tx }
    }

    /// Send a message to all connected clients. Returns how many received it.
    pub fn notify(&self, message: ReloadMessage) -> usize {
        // no connected browser is not an error
        self.reload_tx.send(message).unwrap_or(0)
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the development server router.
pub fn create_router(output_dir: &Path, state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/__livereload", get(livereload_handler))
        .fallback_service(ServeDir::new(output_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Server-Sent Events handler for live reload.
async fn livereload_handler(
    axum::extract::State(state): axum::extract::State<Arc<ServerState>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let rx = state.reload_tx.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| {
        // lagged receivers skip to the newest message
        msg.ok()
            .map(|m| Ok::<_, Infallible>(Event::default().data(m.as_str())))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}

/// JavaScript snippet injected into every page in dev mode.
pub const LIVERELOAD_SCRIPT: &str = r#"<script>
(function() {
    const source = new EventSource('/__livereload');
    source.onmessage = function(event) {
        if (event.data === 'reload') {
            window.location.reload();
        } else if (event.data === 'css-reload') {
            document.querySelectorAll('link[rel="stylesheet"]').forEach(function(link) {
                const href = link.href.split('?')[0];
                link.href = href + '?v=' + Date.now();
            });
        }
    };
    source.onerror = function() {
        console.log('[livereload] Connection lost, retrying...');
    };
})();
</script>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_mapping() {
        assert_eq!(ReloadMessage::for_reload(Reload::None), None);
        assert_eq!(
            ReloadMessage::for_reload(Reload::Css),
            Some(ReloadMessage::CssReload)
        );
        assert_eq!(
            ReloadMessage::for_reload(Reload::Full),
            Some(ReloadMessage::Reload)
        );
    }

    #[test]
    fn test_notify_reaches_subscribers() {
        let state = ServerState::new();
        assert_eq!(state.notify(ReloadMessage::Reload), 0);

        let mut rx = state.reload_tx.subscribe();
        assert_eq!(state.notify(ReloadMessage::CssReload), 1);
        assert_eq!(rx.try_recv().unwrap(), ReloadMessage::CssReload);
    }

    #[test]
    fn test_script_targets_endpoint() {
        assert!(LIVERELOAD_SCRIPT.contains("/__livereload"));
        assert!(LIVERELOAD_SCRIPT.contains("css-reload"));
    }
}
