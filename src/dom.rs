//! The slice of the DOM the page script touches, plus an in-memory document.

use anyhow::{Context, Result};
use maud::{DOCTYPE, Markup, html};
use std::collections::BTreeMap;

pub const DROPDOWN_CONTAINER: &str = "dropdown-container";
pub const QUOTE_CONTAINER: &str = "quote-container";
pub const SHOWS_CONTAINER: &str = "shows-container";
pub const IMAGE_FORM: &str = "image-form";
pub const IMAGE_CONTAINER: &str = "image-container";

/// Class that keeps the upload form out of view until it has a target.
pub const HIDDEN_CLASS: &str = "hidden";

/// Dropdown state as read from the element's inline `display` style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Shown,
    Hidden,
}

impl Visibility {
    /// `"block"` is shown; anything else, including an unset style, is hidden.
    pub fn from_display(value: &str) -> Self {
        if value == "block" {
            Visibility::Shown
        } else {
            Visibility::Hidden
        }
    }

    pub fn as_display(self) -> &'static str {
        match self {
            Visibility::Shown => "block",
            Visibility::Hidden => "none",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Visibility::Shown => Visibility::Hidden,
            Visibility::Hidden => Visibility::Shown,
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            Visibility::Shown => "shown",
            Visibility::Hidden => "hidden",
        };
        write!(f, "{value}")
    }
}

/// Element operations the page needs, addressed by element id.
///
/// Every method fails if no element carries `id`.
pub trait Dom {
    fn display(&self, id: &str) -> Result<String>;
    fn set_display(&mut self, id: &str, value: &str) -> Result<()>;
    fn set_text(&mut self, id: &str, text: &str) -> Result<()>;
    fn set_attribute(&mut self, id: &str, name: &str, value: &str) -> Result<()>;
    fn remove_class(&mut self, id: &str, class: &str) -> Result<()>;
    fn append_image(&mut self, id: &str, src: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub display: String,
    pub text: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: Vec<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Only the tags and attributes the page produces are rendered; anything
    /// else renders as a `div`.
    fn render(&self, id: Option<&str>) -> Markup {
        let style = (!self.display.is_empty()).then(|| format!("display: {}", self.display));
        let class = (!self.classes.is_empty()).then(|| self.classes.join(" "));
        match self.tag.as_str() {
            "img" => html! {
                img id=[id] class=[class] style=[style] src=[self.attr("src")];
            },
            "form" => html! {
                form id=[id] class=[class] style=[style]
                    action=[self.attr("action")]
                    method=[self.attr("method")]
                    enctype=[self.attr("enctype")] {
                    (self.render_children())
                }
            },
            _ => html! {
                div id=[id] class=[class] style=[style] {
                    (self.render_children())
                }
            },
        }
    }

    fn render_children(&self) -> Markup {
        html! {
            (self.text)
            @for child in &self.children {
                (child.render(None))
            }
        }
    }
}

/// A document holding only id-addressed elements, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<(String, Element)>,
}

impl Document {
    /// The portfolio page's skeleton with the upload form still hidden.
    pub fn portfolio() -> Self {
        let mut doc = Self::default();
        doc.insert(DROPDOWN_CONTAINER, Element::new("div"));
        doc.insert(QUOTE_CONTAINER, Element::new("div"));
        doc.insert(SHOWS_CONTAINER, Element::new("div"));
        let mut form = Element::new("form").with_class(HIDDEN_CLASS);
        form.attributes.insert("method".to_string(), "POST".to_string());
        form.attributes.insert("enctype".to_string(), "multipart/form-data".to_string());
        doc.insert(IMAGE_FORM, form);
        doc.insert(IMAGE_CONTAINER, Element::new("div"));
        doc
    }

    pub fn insert(&mut self, id: &str, element: Element) {
        match self.elements.iter_mut().find(|(k, _)| k == id) {
            Some((_, existing)) => *existing = element,
            None => self.elements.push((id.to_string(), element)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|(k, _)| k == id).map(|(_, e)| e)
    }

    fn element(&self, id: &str) -> Result<&Element> {
        self.get(id).with_context(|| format!("element not found: #{id}"))
    }

    fn element_mut(&mut self, id: &str) -> Result<&mut Element> {
        self.elements
            .iter_mut()
            .find(|(k, _)| k == id)
            .map(|(_, e)| e)
            .with_context(|| format!("element not found: #{id}"))
    }

    pub fn render(&self) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    title { "Portfolio" }
                }
                body {
                    @for (id, element) in &self.elements {
                        (element.render(Some(id)))
                    }
                }
            }
        }
    }
}

impl Dom for Document {
    fn display(&self, id: &str) -> Result<String> {
        Ok(self.element(id)?.display.clone())
    }

    fn set_display(&mut self, id: &str, value: &str) -> Result<()> {
        self.element_mut(id)?.display = value.to_string();
        Ok(())
    }

    fn set_text(&mut self, id: &str, text: &str) -> Result<()> {
        let element = self.element_mut(id)?;
        element.text = text.to_string();
        element.children.clear();
        Ok(())
    }

    fn set_attribute(&mut self, id: &str, name: &str, value: &str) -> Result<()> {
        self.element_mut(id)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_class(&mut self, id: &str, class: &str) -> Result<()> {
        self.element_mut(id)?.classes.retain(|c| c != class);
        Ok(())
    }

    fn append_image(&mut self, id: &str, src: &str) -> Result<()> {
        let mut img = Element::new("img");
        img.attributes.insert("src".to_string(), src.to_string());
        self.element_mut(id)?.children.push(img);
        Ok(())
    }
}
