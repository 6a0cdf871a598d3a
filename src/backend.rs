//! Client side of the portfolio backend's HTTP endpoints.

use anyhow::Result;
use serde_json::Value;

pub const DATA: &str = "/data";
pub const DELETE_DATA: &str = "/delete-data";
pub const UPLOAD_URL: &str = "/blobstore-upload-url";
pub const IMAGES: &str = "/images";
pub const MARKERS: &str = "/markers";

/// Path for the show listing, e.g. `/data?count=0`.
pub fn data_path(count: u32) -> String {
    format!("{DATA}?count={count}")
}

/// Transport used by the page. Paths are absolute (`/data?count=3`); the
/// implementation decides what origin they resolve against.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn get_json(&self, path: &str) -> Result<Value>;
    async fn get_text(&self, path: &str) -> Result<String>;
    /// POST url-encoded `form`. An empty form sends no body.
    async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<()>;
}

#[cfg(feature = "cli")]
pub use http::HttpBackend;

#[cfg(feature = "cli")]
mod http {
    use super::Backend;
    use anyhow::{Context, Result, bail};
    use serde_json::Value;

    /// Blocking `ureq` transport. Each call completes before its future
    /// resolves, which is all the sequential page flow needs.
    #[derive(Debug, Clone)]
    pub struct HttpBackend {
        base_url: String,
    }

    impl HttpBackend {
        pub fn new(base_url: &str) -> Self {
            Self {
                base_url: base_url.trim_end_matches('/').to_string(),
            }
        }

        pub fn url(&self, path: &str) -> String {
            format!("{}{}", self.base_url, path)
        }

        fn call(
            &self,
            request: ureq::Request,
            form: Option<&[(&str, &str)]>,
        ) -> Result<ureq::Response> {
            let method = request.method().to_string();
            let url = request.url().to_string();
            tracing::debug!(%method, %url, "request");
            let result = match form {
                Some(form) => request.send_form(form),
                None => request.call(),
            };
            match result {
                Ok(response) => Ok(response),
                Err(ureq::Error::Status(status, response)) => {
                    let body = response.into_string().unwrap_or_default();
                    bail!("{method} {url} failed: {status} - {}", body.trim());
                }
                Err(err) => Err(err).with_context(|| format!("{method} {url} failed")),
            }
        }
    }

    impl Backend for HttpBackend {
        async fn get_json(&self, path: &str) -> Result<Value> {
            let response = self.call(ureq::get(&self.url(path)), None)?;
            response
                .into_json()
                .with_context(|| format!("failed to parse JSON from {path}"))
        }

        async fn get_text(&self, path: &str) -> Result<String> {
            let response = self.call(ureq::get(&self.url(path)), None)?;
            response
                .into_string()
                .with_context(|| format!("failed to read body from {path}"))
        }

        async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<()> {
            let request = ureq::post(&self.url(path));
            if form.is_empty() {
                self.call(request, None)?;
            } else {
                self.call(request, Some(form))?;
            }
            Ok(())
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_path_carries_count() {
        assert_eq!(data_path(0), "/data?count=0");
        assert_eq!(data_path(12), "/data?count=12");
    }
}
