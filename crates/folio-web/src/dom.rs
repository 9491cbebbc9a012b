#![forbid(unsafe_code)]

//! Browser DOM surface.
//!
//! [`scan_document`] reads the page once into [`PageMarkup`] and keeps the
//! element handles in a [`DomSurface`], which then applies runtime patches
//! and effects with `web-sys`.

use folio_core::config::{Classes, PageConfig};
use folio_core::contact::{ContactField, RawFields};
use folio_core::filter::{NAVIGATION_FEATURES, NAVIGATION_TARGET};
use folio_core::markup::{CardAttributes, PageMarkup};
use folio_runtime::program::Effect;
use folio_runtime::render::{ClassRole, DomPatch, Target};
use folio_runtime::surface::{PageSurface, SurfaceError};
use tracing::trace;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement,
    Window,
};

use crate::chrome::{self, CardChrome};

pub(crate) fn js_error(value: JsValue) -> SurfaceError {
    SurfaceError::Host(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

fn select_all(root: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let list = root.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

fn control_value(el: &Element) -> Option<String> {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    el.dyn_ref::<HtmlTextAreaElement>()
        .map(HtmlTextAreaElement::value)
}

/// Owned card attributes, read before building borrowed [`CardAttributes`].
struct ScannedCard {
    tags: Option<String>,
    category: Option<String>,
    url: Option<String>,
    title: Option<String>,
}

impl ScannedCard {
    fn read(card: &Element, config: &PageConfig) -> Result<Self, JsValue> {
        let title = card
            .query_selector(&config.selectors.card_title)?
            .and_then(|h| h.text_content())
            .map(|t| t.trim().to_owned());
        Ok(Self {
            tags: card.get_attribute(&config.attributes.tags),
            category: card.get_attribute(&config.attributes.category),
            url: card.get_attribute(&config.attributes.url),
            title,
        })
    }

    fn attributes(&self) -> CardAttributes<'_> {
        CardAttributes {
            tags: self.tags.as_deref(),
            category: self.category.as_deref(),
            url: self.url.as_deref(),
            title: self.title.as_deref(),
        }
    }
}

/// Element handles for one mounted page.
#[derive(Debug)]
pub struct DomSurface {
    window: Window,
    controls: Vec<Element>,
    cards: Vec<HtmlElement>,
    form: Option<HtmlFormElement>,
    fields: Vec<(ContactField, Element)>,
    message: Option<Element>,
    classes: Classes,
}

/// Scan `document` for everything `config` names.
///
/// Missing optional elements are simply absent from the result.
pub fn scan_document(
    window: Window,
    document: &Document,
    config: &PageConfig,
) -> Result<(PageMarkup, DomSurface), JsValue> {
    let mut markup = PageMarkup::new();

    let controls = select_all(document, &config.selectors.filter_button)?;
    for control in &controls {
        markup = markup.with_filter(control.get_attribute(&config.attributes.filter).as_deref());
    }

    let mut cards = Vec::new();
    for element in select_all(document, &config.selectors.project_card)? {
        let scanned = ScannedCard::read(&element, config)?;
        markup = markup.with_card(scanned.attributes(), &config.default_card_title);
        match element.dyn_into::<HtmlElement>() {
            Ok(card) => cards.push(card),
            Err(_) => return Err(JsValue::from_str("project card is not an HTML element")),
        }
    }

    let form = document
        .query_selector(&config.selectors.contact_form)?
        .and_then(|el| el.dyn_into::<HtmlFormElement>().ok());
    let message = document.query_selector(&config.selectors.form_message)?;

    let mut fields = Vec::new();
    if let Some(form) = &form {
        markup = markup.with_contact_form(message.is_some());
        for field in ContactField::ALL {
            if let Some(el) = form.query_selector(&chrome::field_selector(field))? {
                fields.push((field, el));
            }
        }
    }

    trace!(
        controls = controls.len(),
        cards = cards.len(),
        form = form.is_some(),
        "document scanned"
    );

    let surface = DomSurface {
        window,
        controls,
        cards,
        form,
        fields,
        message,
        classes: config.classes.clone(),
    };
    Ok((markup, surface))
}

/// Year stamp, rel hardening on new-tab links, and focusability for cards
/// that open a link.
pub fn apply_chrome(
    document: &Document,
    config: &PageConfig,
    markup: &PageMarkup,
    surface: &DomSurface,
) -> Result<(), JsValue> {
    if let Some(year) = document.query_selector(&config.selectors.year)? {
        let now = js_sys::Date::new_0().get_full_year();
        year.set_text_content(Some(now.to_string().as_str()));
    }

    for link in select_all(document, &config.selectors.external_link)? {
        if let Some(rel) = chrome::hardened_rel(link.get_attribute("rel").as_deref()) {
            link.set_attribute("rel", &rel)?;
        }
    }

    for (element, card) in surface.cards.iter().zip(&markup.cards) {
        let Some(chrome) = CardChrome::for_card(card) else {
            continue;
        };
        for (name, value) in [
            ("tabindex", chrome.tabindex),
            ("role", chrome.role),
            ("aria-label", chrome.aria_label.as_str()),
        ] {
            if !element.has_attribute(name) {
                element.set_attribute(name, value)?;
            }
        }
        element.style().set_property("cursor", "pointer")?;
    }
    Ok(())
}

impl DomSurface {
    pub fn controls(&self) -> &[Element] {
        &self.controls
    }

    pub fn cards(&self) -> &[HtmlElement] {
        &self.cards
    }

    pub fn form(&self) -> Option<&HtmlFormElement> {
        self.form.as_ref()
    }

    /// Current raw values of the contact form controls.
    pub fn raw_fields(&self) -> RawFields {
        let mut raw = RawFields::default();
        for (field, el) in &self.fields {
            let value = control_value(el);
            match field {
                ContactField::Name => raw.name = value,
                ContactField::Email => raw.email = value,
                ContactField::Message => raw.message = value,
            }
        }
        raw
    }

    fn class_name(&self, class: ClassRole) -> &str {
        match class {
            ClassRole::Active => &self.classes.active,
            ClassRole::Selected => &self.classes.selected,
            ClassRole::Error => &self.classes.error,
            ClassRole::Success => &self.classes.success,
        }
    }

    fn class_target(
        &self,
        target: Target,
        class: ClassRole,
    ) -> Result<Option<&Element>, SurfaceError> {
        match (target, class) {
            (Target::Control(i), ClassRole::Active) => self
                .controls
                .get(i)
                .map(Some)
                .ok_or_else(|| SurfaceError::MissingElement(format!("{target:?}"))),
            (Target::Card(id), ClassRole::Selected) => self
                .cards
                .get(id.index())
                .map(|card| -> Option<&Element> { Some(card) })
                .ok_or_else(|| SurfaceError::MissingElement(id.to_string())),
            (Target::FormMessage, ClassRole::Error | ClassRole::Success) => {
                Ok(self.message.as_ref())
            }
            (target, class) => Err(SurfaceError::Host(format!(
                "class {class:?} not supported on {target:?}"
            ))),
        }
    }
}

impl PageSurface for DomSurface {
    type Error = SurfaceError;

    fn apply_patch(&mut self, patch: &DomPatch) -> Result<(), Self::Error> {
        match patch {
            DomPatch::SetClass { target, class, on } => {
                if let Some(el) = self.class_target(*target, *class)? {
                    el.class_list()
                        .toggle_with_force(self.class_name(*class), *on)
                        .map_err(js_error)?;
                }
            }
            DomPatch::SetVisible { card, visible } => {
                let el = self
                    .cards
                    .get(card.index())
                    .ok_or_else(|| SurfaceError::MissingElement(card.to_string()))?;
                let style = el.style();
                if *visible {
                    style.remove_property("display").map_err(js_error)?;
                } else {
                    style.set_property("display", "none").map_err(js_error)?;
                }
            }
            DomPatch::SetMessageText { text } => {
                if let Some(el) = &self.message {
                    el.set_text_content(Some(text.as_str()));
                }
            }
        }
        Ok(())
    }

    fn run_effect(&mut self, effect: &Effect) -> Result<(), Self::Error> {
        match effect {
            Effect::Navigate(nav) => {
                self.window
                    .open_with_url_and_target_and_features(
                        &nav.url,
                        NAVIGATION_TARGET,
                        NAVIGATION_FEATURES,
                    )
                    .map_err(js_error)?;
            }
            Effect::ResetForm => {
                if let Some(form) = &self.form {
                    form.reset();
                }
            }
            Effect::FocusField(field) => {
                let el = self
                    .fields
                    .iter()
                    .find(|(f, _)| f == field)
                    .and_then(|(_, el)| el.dyn_ref::<HtmlElement>());
                if let Some(el) = el {
                    el.focus().map_err(js_error)?;
                }
            }
        }
        Ok(())
    }
}
