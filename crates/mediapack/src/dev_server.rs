//! A static file server for the project source directory.

use std::{
  net::{Ipv4Addr, SocketAddr},
  path::{Path, PathBuf},
};

use axum::{
  Router,
  extract::Request,
  http::StatusCode,
  middleware::{self, Next},
  response::{IntoResponse, Response},
};
use mediapack_common::NormalizedPipelineOptions;
use tokio::net::TcpListener;
use tower_http::{
  services::{ServeDir, ServeFile},
  trace::TraceLayer,
};

/// Files under `root`; any path that is not a file gets the `fallback` page, so client side
/// routes load the app.
pub fn router(root: &Path, fallback: &str) -> Router {
  let files = ServeDir::new(root).fallback(ServeFile::new(root.join(fallback)));

  Router::new()
    .fallback_service(files)
    .layer(middleware::from_fn(reject_parent_segments))
    .layer(TraceLayer::new_for_http())
}

async fn reject_parent_segments(request: Request, next: Next) -> Response {
  let escapes_root = request
    .uri()
    .path()
    .split('/')
    .any(|segment| segment == ".." || segment.eq_ignore_ascii_case("%2e%2e"));
  if escapes_root {
    return StatusCode::FORBIDDEN.into_response();
  }
  next.run(request).await
}

pub struct DevServer {
  listener: TcpListener,
  root: PathBuf,
  router: Router,
}

impl DevServer {
  pub async fn bind(addr: SocketAddr, root: PathBuf, fallback: &str) -> anyhow::Result<Self> {
    let listener = TcpListener::bind(addr)
      .await
      .map_err(|err| anyhow::anyhow!("Failed to listen on {addr}: {err}"))?;
    let router = router(&root, fallback);
    Ok(Self { listener, root, router })
  }

  pub async fn from_options(options: &NormalizedPipelineOptions) -> anyhow::Result<Self> {
    Self::bind(
      SocketAddr::from((Ipv4Addr::LOCALHOST, options.port)),
      options.resolve(&options.paths.serve_root),
      &format!("{}.html", options.template),
    )
    .await
  }

  pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
    self.listener.local_addr()
  }

  /// Serves until the process ends.
  pub async fn run(self) -> anyhow::Result<()> {
    tracing::info!("Serving {} on http://{}", self.root.display(), self.local_addr()?);
    axum::serve(self.listener, self.router)
      .await
      .map_err(|err| anyhow::anyhow!("Dev server stopped: {err}"))
  }
}

/// Binds the configured port and serves forever.
pub async fn serve(options: &NormalizedPipelineOptions) -> anyhow::Result<()> {
  DevServer::from_options(options).await?.run().await
}

#[cfg(test)]
mod tests {
  use std::net::{Ipv4Addr, SocketAddr};

  use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
  };
  use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
  };
  use tower::ServiceExt;

  use super::{DevServer, router};

  fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
    std::fs::write(dir.path().join("app.css"), "body{}").unwrap();
    std::fs::write(dir.path().join("a b.css"), ".spaced{}").unwrap();
    dir
  }

  async fn request(
    dir: &tempfile::TempDir,
    method: Method,
    uri: &str,
  ) -> (StatusCode, String, String) {
    let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
    let response = router(dir.path(), "index.html").oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
      .headers()
      .get(header::CONTENT_TYPE)
      .map(|value| value.to_str().unwrap().to_string())
      .unwrap_or_default();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
  }

  #[tokio::test]
  async fn serves_files_with_their_content_type() {
    let dir = project();

    let (status, content_type, body) = request(&dir, Method::GET, "/app.css?v=1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/css"));
    assert_eq!(body, "body{}");

    let (_, _, body) = request(&dir, Method::GET, "/a%20b.css").await;
    assert_eq!(body, ".spaced{}");

    let (status, _, body) = request(&dir, Method::HEAD, "/app.css").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
  }

  #[tokio::test]
  async fn unknown_paths_get_the_app_page() {
    let dir = project();
    let (status, content_type, body) = request(&dir, Method::GET, "/settings/account").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/html"));
    assert_eq!(body, "<html></html>");
  }

  #[tokio::test]
  async fn parent_segments_are_forbidden() {
    let dir = project();
    let (status, ..) = request(&dir, Method::GET, "/../secret").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, ..) = request(&dir, Method::GET, "/media/%2E%2E/secret").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn keeps_connections_alive() {
    let dir = project();
    let server = DevServer::bind(
      SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
      dir.path().to_path_buf(),
      "index.html",
    )
    .await
    .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
      .write_all(
        b"GET /app.css HTTP/1.1\r\nHost: localhost\r\n\r\n\
          GET /index.html HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
      )
      .await
      .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert_eq!(response.matches("HTTP/1.1 200 OK").count(), 2);
    assert!(response.contains("body{}"));
    assert!(response.ends_with("<html></html>"));
  }
}
