//! The portfolio page's handlers.

use anyhow::{Context, Result, bail};
use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::Value;

use crate::backend::{self, Backend};
use crate::dom::{self, Dom, Visibility};

pub const QUOTES: [&str; 3] = [
    "Her?",
    "Everything changed when the fire nation attacked",
    "I'm the one who knocks!",
];

/// Titles requested on page load.
pub const DEFAULT_SHOW_COUNT: u32 = 10;

/// Pick a quote uniformly from [`QUOTES`].
pub fn pick_quote<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    QUOTES.choose(rng).copied().unwrap_or(QUOTES[0])
}

/// Render a parsed JSON value the way a browser coerces it to a string when
/// assigned to `innerText`.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(display_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => js_number(f),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
    }
}

/// `String(n)` for a finite double: no trailing `.0`, `-0` is `0`, and
/// exponent form outside `[1e-6, 1e21)` with an explicit sign.
fn js_number(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let abs = f.abs();
    if (1e-6..1e21).contains(&abs) {
        return f.to_string();
    }
    let formatted = format!("{f:e}");
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => formatted,
    }
}

/// One page: the DOM it renders into and the backend it talks to.
pub struct Page<D, B> {
    dom: D,
    backend: B,
}

impl<D: Dom, B: Backend> Page<D, B> {
    pub fn new(dom: D, backend: B) -> Self {
        Self { dom, backend }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Flip the navigation dropdown and return its new state.
    pub fn toggle_dropdown(&mut self) -> Result<Visibility> {
        let current = Visibility::from_display(&self.dom.display(dom::DROPDOWN_CONTAINER)?);
        let next = current.flipped();
        self.dom.set_display(dom::DROPDOWN_CONTAINER, next.as_display())?;
        Ok(next)
    }

    pub fn add_random_quote(&mut self) -> Result<&'static str> {
        self.add_quote_with(&mut rand::thread_rng())
    }

    pub fn add_quote_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&'static str> {
        let quote = pick_quote(rng);
        self.dom.set_text(dom::QUOTE_CONTAINER, quote)?;
        Ok(quote)
    }

    /// Fetch up to `count` show titles and write them into the shows container.
    pub async fn get_show_titles(&mut self, count: u32) -> Result<String> {
        let shows = self.backend.get_json(&backend::data_path(count)).await?;
        let text = display_text(&shows);
        self.dom.set_text(dom::SHOWS_CONTAINER, &text)?;
        tracing::debug!(count, "rendered show titles");
        Ok(text)
    }

    /// Clear server-side shows, then refresh the listing.
    pub async fn delete_data(&mut self) -> Result<()> {
        self.backend
            .post_form(backend::DELETE_DATA, &[])
            .await
            .context("failed to delete data")?;
        tracing::info!("deleted all data");
        self.get_show_titles(0).await?;
        Ok(())
    }

    /// Point the upload form at a fresh blobstore URL and reveal it.
    pub async fn init_upload_form(&mut self) -> Result<String> {
        let url = self.backend.get_text(backend::UPLOAD_URL).await?;
        self.dom.set_attribute(dom::IMAGE_FORM, "action", &url)?;
        self.dom.remove_class(dom::IMAGE_FORM, dom::HIDDEN_CLASS)?;
        tracing::debug!(%url, "upload form ready");
        Ok(url)
    }

    /// Append one image per URL returned by the backend, in order.
    pub async fn load_images(&mut self) -> Result<usize> {
        let value = self.backend.get_json(backend::IMAGES).await?;
        let urls = image_urls(value)?;
        for url in &urls {
            self.dom.append_image(dom::IMAGE_CONTAINER, url)?;
        }
        tracing::debug!(count = urls.len(), "appended images");
        Ok(urls.len())
    }

    /// Submit a new show title.
    pub async fn add_show(&mut self, text: &str) -> Result<()> {
        self.backend
            .post_form(backend::DATA, &[("text-input", text)])
            .await
            .context("failed to add show")?;
        tracing::info!("added show");
        Ok(())
    }

    /// Upload form, then titles, then images; each awaited before the next.
    pub async fn on_load(&mut self, show_count: u32) -> Result<()> {
        self.init_upload_form().await?;
        self.get_show_titles(show_count).await?;
        self.load_images().await?;
        tracing::info!("page loaded");
        Ok(())
    }
}

fn image_urls(value: Value) -> Result<Vec<String>> {
    let Value::Array(items) = value else {
        bail!("expected a JSON array of image URLs");
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::String(url) => Ok(url),
            other => bail!("expected an image URL string, got {other}"),
        })
        .collect()
}
