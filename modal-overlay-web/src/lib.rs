mod dom_backend;

use std::collections::BTreeMap;
use std::rc::Rc;

use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use modal_overlay::{Modal, ModalError, ModalState, SpinnerKind, Variant};

use crate::dom_backend::DomBackend;

#[wasm_bindgen(start)]
pub fn start() {
    if console_log::init_with_level(log::Level::Debug).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

fn to_js(e: ModalError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn dom_backend() -> Result<Rc<DomBackend>, JsValue> {
    DomBackend::new().map(Rc::new).map_err(to_js)
}

fn constants<'a>(pairs: impl Iterator<Item = (String, &'a str)>) -> Result<JsValue, JsValue> {
    let map: BTreeMap<String, &str> = pairs.collect();
    Ok(map.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

/// `{DANGER: "danger", ...}`, for pages that key styling off the type names.
#[wasm_bindgen(js_name = modalTypes)]
pub fn modal_types() -> Result<JsValue, JsValue> {
    constants(Variant::ALL.iter().map(|v| (v.as_str().to_uppercase(), v.as_str())))
}

/// `{CIRCLE: "circle", IPHONE_1: "iphone-1", ...}`.
#[wasm_bindgen(js_name = modalSpinners)]
pub fn modal_spinners() -> Result<JsValue, JsValue> {
    constants(
        SpinnerKind::ALL
            .iter()
            .map(|s| (s.as_str().to_uppercase().replace('-', "_"), s.as_str())),
    )
}

#[wasm_bindgen(js_name = Modal)]
pub struct JsModal {
    inner: Modal<DomBackend>,
}

impl JsModal {
    fn alert(variant: Variant, message: String, title: Option<String>, closable: Option<bool>) -> Result<JsModal, JsValue> {
        let inner = Modal::alert(dom_backend()?, variant, message, title, closable).map_err(to_js)?;
        Ok(JsModal { inner })
    }
}

#[wasm_bindgen(js_class = Modal)]
impl JsModal {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsModal, JsValue> {
        let partial: serde_json::Value = serde_wasm_bindgen::from_value(config)?;
        let inner = Modal::new(dom_backend()?, Some(&partial)).map_err(to_js)?;
        Ok(JsModal { inner })
    }

    pub fn success(message: String, title: Option<String>, closable: Option<bool>) -> Result<JsModal, JsValue> {
        Self::alert(Variant::Success, message, title, closable)
    }

    pub fn warning(message: String, title: Option<String>, closable: Option<bool>) -> Result<JsModal, JsValue> {
        Self::alert(Variant::Warning, message, title, closable)
    }

    pub fn danger(message: String, title: Option<String>, closable: Option<bool>) -> Result<JsModal, JsValue> {
        Self::alert(Variant::Danger, message, title, closable)
    }

    pub fn light(message: String, title: Option<String>, closable: Option<bool>) -> Result<JsModal, JsValue> {
        Self::alert(Variant::Light, message, title, closable)
    }

    pub fn dark(message: String, title: Option<String>, closable: Option<bool>) -> Result<JsModal, JsValue> {
        Self::alert(Variant::Dark, message, title, closable)
    }

    pub fn loading(message: String, spinner: Option<String>) -> Result<JsModal, JsValue> {
        let spinner = spinner
            .map(|s| s.parse::<SpinnerKind>())
            .transpose()
            .map_err(to_js)?;
        let inner = Modal::loading(dom_backend()?, message, spinner).map_err(to_js)?;
        Ok(JsModal { inner })
    }

    pub fn close(&self) -> Result<(), JsValue> {
        self.inner.close().map_err(to_js)
    }

    pub fn dispose(&self) {
        self.inner.dispose();
    }

    /// Registers `callback(modal)`, called once after teardown.
    ///
    /// The argument is a fresh `Modal` wrapper around the same instance, so
    /// `m === modal` is false; use `m.sameAs(modal)` to compare.
    #[wasm_bindgen(setter = onClose)]
    pub fn set_on_close(&self, callback: Function) {
        self.inner.set_on_close(move |modal| {
            let this = JsValue::from(JsModal { inner: modal.clone() });
            if let Err(e) = callback.call1(&JsValue::NULL, &this) {
                log::error!("onClose callback failed: {:?}", e);
            }
        });
    }

    #[wasm_bindgen(js_name = sameAs)]
    pub fn same_as(&self, other: &JsModal) -> bool {
        self.inner.ptr_eq(&other.inner)
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        match self.inner.state() {
            ModalState::Open => "open",
            ModalState::Closing => "closing",
            ModalState::Closed => "closed",
        }
        .to_string()
    }
}
