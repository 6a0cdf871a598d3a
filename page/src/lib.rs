//! Browser entry point for the portfolio page.
//!
//! Build with `wasm-pack build page --target web` and load the generated module
//! from `index.html`; the exported handlers keep the names the markup calls.

use anyhow::{anyhow, Context, Result};
use portfolio::{Backend, Dom, Page, DEFAULT_SHOW_COUNT};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlElement, RequestInit, Response, UrlSearchParams};

fn js_error(err: JsValue) -> anyhow::Error {
    match err.as_string() {
        Some(message) => anyhow!(message),
        None => anyhow!("{err:?}"),
    }
}

fn to_js(err: anyhow::Error) -> JsValue {
    js_sys::Error::new(&format!("{err:#}")).into()
}

/// The live document.
struct WebDom {
    document: web_sys::Document,
}

impl WebDom {
    fn current() -> Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .context("no document")?;
        Ok(Self { document })
    }

    fn element(&self, id: &str) -> Result<web_sys::Element> {
        self.document
            .get_element_by_id(id)
            .with_context(|| format!("element not found: #{id}"))
    }

    fn html_element(&self, id: &str) -> Result<HtmlElement> {
        self.element(id)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| anyhow!("#{id} is not an HTML element"))
    }
}

impl Dom for WebDom {
    fn display(&self, id: &str) -> Result<String> {
        self.html_element(id)?
            .style()
            .get_property_value("display")
            .map_err(js_error)
    }

    fn set_display(&mut self, id: &str, value: &str) -> Result<()> {
        self.html_element(id)?
            .style()
            .set_property("display", value)
            .map_err(js_error)
    }

    fn set_text(&mut self, id: &str, text: &str) -> Result<()> {
        self.html_element(id)?.set_inner_text(text);
        Ok(())
    }

    fn set_attribute(&mut self, id: &str, name: &str, value: &str) -> Result<()> {
        self.element(id)?
            .set_attribute(name, value)
            .map_err(js_error)
    }

    fn remove_class(&mut self, id: &str, class: &str) -> Result<()> {
        self.element(id)?
            .class_list()
            .remove_1(class)
            .map_err(js_error)
    }

    fn append_image(&mut self, id: &str, src: &str) -> Result<()> {
        let container = self.element(id)?;
        let img = self.document.create_element("img").map_err(js_error)?;
        img.set_attribute("src", src).map_err(js_error)?;
        container.append_child(&img).map_err(js_error)?;
        Ok(())
    }
}

/// `window.fetch` against the page's own origin. Like the browser API, a
/// response with an error status still resolves; only its body is read.
struct FetchBackend;

impl FetchBackend {
    async fn fetch(&self, path: &str, init: &RequestInit) -> Result<Response> {
        let window = web_sys::window().context("no window")?;
        let value = JsFuture::from(window.fetch_with_str_and_init(path, init))
            .await
            .map_err(js_error)
            .with_context(|| format!("fetch {path} failed"))?;
        value.dyn_into::<Response>().map_err(js_error)
    }

    async fn text(&self, path: &str, init: &RequestInit) -> Result<String> {
        let response = self.fetch(path, init).await?;
        let body = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        body.as_string()
            .with_context(|| format!("non-text body from {path}"))
    }
}

impl Backend for FetchBackend {
    async fn get_json(&self, path: &str) -> Result<Value> {
        let body = self.text(path, &RequestInit::new()).await?;
        serde_json::from_str(&body).with_context(|| format!("failed to parse JSON from {path}"))
    }

    async fn get_text(&self, path: &str) -> Result<String> {
        self.text(path, &RequestInit::new()).await
    }

    async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<()> {
        let init = RequestInit::new();
        init.set_method("POST");
        if !form.is_empty() {
            let params = UrlSearchParams::new().map_err(js_error)?;
            for (key, value) in form {
                params.append(key, value);
            }
            init.set_body(&params.into());
        }
        self.fetch(path, &init).await?;
        Ok(())
    }
}

fn page() -> Result<Page<WebDom, FetchBackend>> {
    Ok(Page::new(WebDom::current()?, FetchBackend))
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_bindgen_futures::spawn_local(async {
        let result = match page() {
            Ok(mut page) => page.on_load(DEFAULT_SHOW_COUNT).await,
            Err(err) => Err(err),
        };
        if let Err(err) = result {
            web_sys::console::error_1(&to_js(err));
        }
    });
}

#[wasm_bindgen(js_name = displayHamburgerDropdown)]
pub fn display_hamburger_dropdown() -> Result<(), JsValue> {
    page().and_then(|mut page| page.toggle_dropdown()).map_err(to_js)?;
    Ok(())
}

#[wasm_bindgen(js_name = addRandomQuote)]
pub fn add_random_quote() -> Result<(), JsValue> {
    page().and_then(|mut page| page.add_random_quote()).map_err(to_js)?;
    Ok(())
}

#[wasm_bindgen(js_name = getShowTitles)]
pub async fn get_show_titles(count: u32) -> Result<(), JsValue> {
    let mut page = page().map_err(to_js)?;
    page.get_show_titles(count).await.map_err(to_js)?;
    Ok(())
}

#[wasm_bindgen(js_name = deleteData)]
pub async fn delete_data() -> Result<(), JsValue> {
    let mut page = page().map_err(to_js)?;
    page.delete_data().await.map_err(to_js)
}
