//! WebDAV implementation of the remote store.

use async_trait::async_trait;
use reqwest::{Body, Method, StatusCode};
use tokio_util::io::ReaderStream;
use tracing::debug;
use url::Url;

use crate::error::{DavError, Result};
use crate::store::{Content, RemoteStore};

/// Permission hint used for parent collections created during uploads.
const DIRECTORY_MODE: u32 = 0o755;

/// WebDAV client authenticating with HTTP basic auth.
pub struct WebDavClient {
    /// Server URL, always ending in `/`.
    base: Url,

    username: String,

    password: String,

    /// HTTP client.
    client: reqwest::Client,
}

impl WebDavClient {
    /// Create a client for the server at `server`.
    pub fn new(
        server: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let mut base = Url::parse(server)?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(DavError::UnsupportedUrl(server.to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            base,
            username: username.into(),
            password: password.into(),
            client: reqwest::Client::new(),
        })
    }

    /// Use a preconfigured HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The server URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve a store path to a request URL, percent-encoding each segment.
    /// Collections get a trailing slash.
    fn url(&self, path: &str, collection: bool) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| DavError::UnsupportedUrl(self.base.to_string()))?;
            segments.pop_if_empty().extend(segments_of(path));
            if collection {
                segments.push("");
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password))
    }

    async fn mkcol(&self, path: &str) -> Result<StatusCode> {
        let url = self.url(path, true)?;
        let response = self
            .request(Method::from_bytes(b"MKCOL")?, url)
            .send()
            .await?;
        Ok(response.status())
    }
}

#[async_trait]
impl RemoteStore for WebDavClient {
    async fn write_stream(&self, path: &str, content: Content, _mode: u32) -> Result<()> {
        if let Some((parent, _)) = path.trim_matches('/').rsplit_once('/') {
            self.make_directory_recursive(parent, DIRECTORY_MODE).await?;
        }

        let url = self.url(path, false)?;
        debug!("PUT {url}");
        let body = Body::wrap_stream(ReaderStream::new(content));
        let response = self.request(Method::PUT, url).body(body).send().await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => Ok(()),
            status => Err(status_error("PUT", path, status)),
        }
    }

    async fn make_directory_recursive(&self, path: &str, _mode: u32) -> Result<()> {
        if segments_of(path).next().is_none() {
            return Ok(());
        }

        match self.mkcol(path).await? {
            status if created_or_exists(status) => return Ok(()),
            StatusCode::CONFLICT => {}
            status => return Err(status_error("MKCOL", path, status)),
        }

        // 409: an ancestor is missing, create the chain from the top.
        debug!("Creating missing ancestors of {path}");
        let mut current = String::new();
        for segment in segments_of(path) {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);

            let status = self.mkcol(&current).await?;
            if !created_or_exists(status) {
                return Err(status_error("MKCOL", &current, status));
            }
        }
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<()> {
        let url = self.url(path, false)?;
        debug!("DELETE {url}");
        let response = self.request(Method::DELETE, url).send().await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => Ok(()),
            status => Err(status_error("DELETE", path, status)),
        }
    }
}

fn segments_of(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn created_or_exists(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::OK | StatusCode::CREATED | StatusCode::METHOD_NOT_ALLOWED
    )
}

fn status_error(method: &str, path: &str, status: StatusCode) -> DavError {
    DavError::Status {
        method: method.to_string(),
        path: path.to_string(),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{basic_auth, body_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> WebDavClient {
        WebDavClient::new(&format!("{}/dav", server.uri()), "alice", "secret").unwrap()
    }

    #[test]
    fn test_rejects_non_http_urls() {
        let result = WebDavClient::new("ftp://example.com/dav", "u", "p");
        assert!(matches!(result, Err(DavError::UnsupportedUrl(_))));

        let result = WebDavClient::new("not a url", "u", "p");
        assert!(matches!(result, Err(DavError::InvalidUrl(_))));
    }

    #[test]
    fn test_url_encodes_segments() {
        let client = WebDavClient::new("https://example.com/dav", "u", "p").unwrap();
        assert_eq!(client.base_url().as_str(), "https://example.com/dav/");

        let url = client.url("remote//docs/my notes.txt", false).unwrap();
        assert_eq!(url.as_str(), "https://example.com/dav/remote/docs/my%20notes.txt");

        let url = client.url("remote/docs", true).unwrap();
        assert_eq!(url.as_str(), "https://example.com/dav/remote/docs/");
    }

    #[tokio::test]
    async fn test_write_stream_creates_parent_and_puts_content() {
        let server = MockServer::start().await;
        Mock::given(method("MKCOL"))
            .and(path("/dav/remote/sync/"))
            .and(basic_auth("alice", "secret"))
            .respond_with(ResponseTemplate::new(405))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/dav/remote/sync/notes.txt"))
            .and(basic_auth("alice", "secret"))
            .and(body_string("hello webdav"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let content: Content = Box::new(std::io::Cursor::new(b"hello webdav".to_vec()));
        client(&server)
            .write_stream("remote/sync/notes.txt", content, 0o644)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_write_stream_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/dav/notes.txt"))
            .respond_with(ResponseTemplate::new(507))
            .mount(&server)
            .await;

        let content: Content = Box::new(std::io::Cursor::new(Vec::new()));
        let err = client(&server)
            .write_stream("notes.txt", content, 0o644)
            .await
            .unwrap_err();

        match err {
            DavError::Status { method, path, status } => {
                assert_eq!(method, "PUT");
                assert_eq!(path, "notes.txt");
                assert_eq!(status, StatusCode::INSUFFICIENT_STORAGE);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_make_directory_creates_missing_ancestors() {
        let server = MockServer::start().await;
        Mock::given(method("MKCOL"))
            .and(path("/dav/a/b/c/"))
            .respond_with(ResponseTemplate::new(409))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("MKCOL"))
            .and(path("/dav/a/b/c/"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("MKCOL"))
            .and(path("/dav/a/"))
            .respond_with(ResponseTemplate::new(405))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("MKCOL"))
            .and(path("/dav/a/b/"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .make_directory_recursive("a/b/c", 0o755)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_make_directory_existing_is_ok() {
        let server = MockServer::start().await;
        Mock::given(method("MKCOL"))
            .and(path("/dav/docs/"))
            .respond_with(ResponseTemplate::new(405))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .make_directory_recursive("docs", 0o755)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_remove_tolerates_missing_object() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/dav/gone.txt"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/dav/locked.txt"))
            .respond_with(ResponseTemplate::new(423))
            .mount(&server)
            .await;

        let client = client(&server);
        client.remove("gone.txt").await.unwrap();
        assert!(matches!(
            client.remove("locked.txt").await,
            Err(DavError::Status { .. })
        ));
    }
}
