#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::OnceLock;

use folio_core::config::PageConfig;
use folio_core::event::{ActivationKey, PageEvent};
use folio_core::markup::CardId;
use folio_runtime::log_capture::{self, LogCaptureHandle};
use folio_runtime::program::PortfolioPage;
use folio_runtime::runtime::{DispatchReport, PageRuntime};
use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use tracing::{Level, debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, EventTarget, KeyboardEvent, Node};

use crate::dom::{self, DomSurface};

const LOG_CAPACITY: usize = 512;

/// Installed once per module instance; `None` if the host already set a
/// global subscriber.
static LOGS: OnceLock<Option<LogCaptureHandle>> = OnceLock::new();

fn logs() -> Option<&'static LogCaptureHandle> {
    LOGS.get_or_init(|| log_capture::install(Level::DEBUG, LOG_CAPACITY).ok())
        .as_ref()
}

fn to_js(err: impl fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

type SharedRuntime = Rc<RefCell<PageRuntime<DomSurface>>>;

fn dispatch_shared(runtime: &SharedRuntime, event: &PageEvent) -> Option<DispatchReport> {
    match runtime.try_borrow_mut() {
        Ok(mut rt) => Some(rt.dispatch(event)),
        Err(_) => {
            warn!(kind = event.kind(), "re-entrant page event dropped");
            None
        }
    }
}

/// Listener allowed to call `prevent_default`.
fn blocking_listener<F>(
    target: &EventTarget,
    event_type: &'static str,
    callback: F,
) -> EventListener
where
    F: FnMut(&Event) + 'static,
{
    EventListener::new_with_options(
        target,
        event_type,
        EventListenerOptions {
            phase: EventListenerPhase::Bubble,
            passive: false,
        },
        callback,
    )
}

fn event_element(event: &Event) -> Option<Element> {
    event.target().and_then(|t| t.dyn_into::<Element>().ok())
}

/// Whether the click landed on a hyperlink nested inside `card`.
fn clicked_inside_link(event: &Event, card: &Element) -> bool {
    let Some(target) = event_element(event) else {
        return false;
    };
    match target.closest("a") {
        Ok(Some(link)) => {
            let link: &Node = &link;
            card.contains(Some(link))
        }
        _ => false,
    }
}

/// Whether `card` itself, not a descendant, received the event.
fn targets_card(event: &Event, card: &Element) -> bool {
    let card: &Node = card;
    event_element(event).is_some_and(|target| target.is_same_node(Some(card)))
}

fn install_listeners(runtime: &SharedRuntime) -> Vec<EventListener> {
    let (controls, cards, form) = {
        let rt = runtime.borrow();
        let surface = rt.surface();
        (
            surface.controls().to_vec(),
            surface.cards().to_vec(),
            surface.form().cloned(),
        )
    };
    let mut listeners = Vec::new();

    for (index, control) in controls.iter().enumerate() {
        let rt = Rc::clone(runtime);
        listeners.push(EventListener::new(control, "click", move |_event: &Event| {
            dispatch_shared(&rt, &PageEvent::FilterClick { control: index });
        }));
    }

    for (index, card) in cards.iter().enumerate() {
        let rt = Rc::clone(runtime);
        let host = card.clone();
        listeners.push(EventListener::new(card, "click", move |event: &Event| {
            let inside_link = clicked_inside_link(event, &host);
            dispatch_shared(
                &rt,
                &PageEvent::CardClick {
                    card: CardId(index),
                    inside_link,
                },
            );
        }));

        let rt = Rc::clone(runtime);
        let host = card.clone();
        listeners.push(blocking_listener(card, "keydown", move |event: &Event| {
            let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let key = key_event.key();
            if ActivationKey::from_dom_key(&key).is_none() || !targets_card(event, &host) {
                return;
            }
            event.prevent_default();
            dispatch_shared(
                &rt,
                &PageEvent::CardKey {
                    card: CardId(index),
                    key,
                },
            );
        }));
    }

    if let Some(form) = form {
        let rt = Rc::clone(runtime);
        listeners.push(EventListener::new(&form, "input", move |_event: &Event| {
            let Ok(fields) = rt.try_borrow().map(|r| r.surface().raw_fields()) else {
                return;
            };
            dispatch_shared(&rt, &PageEvent::FormInput { fields });
        }));

        let rt = Rc::clone(runtime);
        listeners.push(blocking_listener(&form, "submit", move |event: &Event| {
            event.prevent_default();
            let Ok(fields) = rt.try_borrow().map(|r| r.surface().raw_fields()) else {
                return;
            };
            dispatch_shared(&rt, &PageEvent::FormSubmit { fields });
        }));
    }

    listeners
}

struct Mounted {
    runtime: SharedRuntime,
    listeners: Vec<EventListener>,
}

/// Portfolio page behaviour bound to the current document.
///
/// JS usage: `const page = new PortfolioWeb(); page.mount(optionsJson);`.
/// Dropping the listeners on `destroy` detaches every handler.
#[wasm_bindgen]
pub struct PortfolioWeb {
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl PortfolioWeb {
    #[wasm_bindgen(constructor)]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self { mounted: None }
    }

    /// Scan the document, wire listeners, and normalize the page.
    ///
    /// `options` is a JSON `PageConfig` override; missing keys keep their
    /// defaults. Mounting again replaces the previous mount.
    pub fn mount(&mut self, options: Option<String>) -> Result<(), JsValue> {
        let _ = logs();
        self.destroy();

        let config = match options.as_deref() {
            Some(json) if !json.trim().is_empty() => PageConfig::from_json(json).map_err(to_js)?,
            _ => PageConfig::default(),
        };
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let (markup, surface) = dom::scan_document(window, &document, &config)?;
        if let Err(err) = dom::apply_chrome(&document, &config, &markup, &surface) {
            warn!(error = ?err, "page chrome skipped");
        }

        let runtime = Rc::new(RefCell::new(PageRuntime::new(
            PortfolioPage::new(markup, &config),
            surface,
        )));
        runtime.borrow_mut().start();
        let listeners = install_listeners(&runtime);
        debug!(listeners = listeners.len(), "page mounted");

        self.mounted = Some(Mounted { runtime, listeners });
        Ok(())
    }

    /// Dispatch a JSON page event as if the user had produced it.
    ///
    /// Returns the dispatch report as JSON.
    pub fn dispatch(&mut self, event_json: &str) -> Result<String, JsValue> {
        let mounted = self
            .mounted
            .as_ref()
            .ok_or_else(|| JsValue::from_str("page not mounted"))?;
        let event = PageEvent::from_json_str(event_json).map_err(to_js)?;
        let report = dispatch_shared(&mounted.runtime, &event).unwrap_or_default();
        serde_json::to_string(&report).map_err(to_js)
    }

    /// Current filter, selection, draft, and message as JSON.
    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        let mounted = self
            .mounted
            .as_ref()
            .ok_or_else(|| JsValue::from_str("page not mounted"))?;
        let rt = mounted.runtime.try_borrow().map_err(to_js)?;
        serde_json::to_string(&rt.page().snapshot()).map_err(to_js)
    }

    /// Take the captured log lines, oldest first.
    #[wasm_bindgen(js_name = drainLogs)]
    pub fn drain_logs(&self) -> Vec<String> {
        logs().map(LogCaptureHandle::drain).unwrap_or_default()
    }

    /// Detach every listener and drop page state.
    pub fn destroy(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            debug!(listeners = mounted.listeners.len(), "page unmounted");
        }
    }
}
