use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use modal_overlay::{Backend, Fragment, ModalError};

/// Mounts modals into `document.body` and times them with `window.setTimeout`.
pub struct DomBackend {
    window: Window,
    document: Document,
}

impl DomBackend {
    pub fn new() -> Result<DomBackend, ModalError> {
        let window = web_sys::window().ok_or(ModalError::MountTargetMissing)?;
        let document = window.document().ok_or(ModalError::MountTargetMissing)?;

        Ok(DomBackend { window, document })
    }

    fn body(&self) -> Result<HtmlElement, ModalError> {
        self.document.body().ok_or(ModalError::MountTargetMissing)
    }
}

fn js_error(e: JsValue) -> ModalError {
    ModalError::Backend(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

impl Backend for DomBackend {
    type Element = Element;
    type Timer = i32;

    fn attach(&self, fragment: &Fragment, on_close: Option<Box<dyn Fn()>>) -> Result<Element, ModalError> {
        let body = self.body()?;

        let element = self.document.create_element("div").map_err(js_error)?;
        element.set_class_name(&fragment.class_attr());
        element.set_inner_html(&fragment.inner_html);

        if let (Some(selector), Some(handler)) = (fragment.close_selector, on_close) {
            if let Some(target) = element.query_selector(selector).map_err(js_error)? {
                let listener = Closure::<dyn FnMut()>::new(move || handler());
                target
                    .add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
                    .map_err(js_error)?;
                // Lives as long as the page; the handler only holds a weak modal reference.
                listener.forget();
            }
        }

        body.append_child(&element).map_err(js_error)?;
        Ok(element)
    }

    fn detach(&self, element: &Element) {
        element.remove();
    }

    fn swap_class(&self, element: &Element, remove: &str, add: &str) -> Result<(), ModalError> {
        let classes = element.class_list();
        classes.remove_1(remove).map_err(js_error)?;
        classes.add_1(add).map_err(js_error)
    }

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Result<i32, ModalError> {
        let callback = Closure::once_into_js(move || task());
        let timeout = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);

        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), timeout)
            .map_err(js_error)
    }

    fn cancel(&self, timer: i32) {
        self.window.clear_timeout_with_handle(timer);
    }
}
