//! Local HTTP servers standing in for the AI vendors in client tests.

use axum::http::header;
use axum::routing::get;
use axum::Router;

pub(crate) const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

/// Serves `router` on an ephemeral port and returns its base URL.
pub(crate) async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Adds `GET /files/caricature.png` returning [`FAKE_PNG`].
pub(crate) fn with_image_file<S: Clone + Send + Sync + 'static>(router: Router<S>) -> Router<S> {
    router.route(
        "/files/caricature.png",
        get(|| async { ([(header::CONTENT_TYPE, "image/png")], FAKE_PNG) }),
    )
}
