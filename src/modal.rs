use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use log::{debug, warn};
use serde_json::Value;

use crate::backends::backend::Backend;
use crate::config::{Config, ConfigPatch, SpinnerKind, Variant};
use crate::error::ModalError;
use crate::markup::{Fragment, Role};

/// Time between `close()` and the removal of the overlay elements.
pub const TEARDOWN_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Open,
    Closing,
    Closed,
}

type CloseCallback<B> = Box<dyn FnMut(&Modal<B>)>;

struct Mounted<E> {
    backdrop: E,
    dialog: E,
}

struct Shared<B: Backend> {
    backend: Rc<B>,
    config: Config,
    state: Cell<ModalState>,
    mounted: RefCell<Option<Mounted<B::Element>>>,
    timer: RefCell<Option<B::Timer>>,
    on_close: RefCell<Option<CloseCallback<B>>>,
}

/// Handle to one mounted modal. Clones refer to the same instance.
pub struct Modal<B: Backend> {
    shared: Rc<Shared<B>>,
}

impl<B: Backend> Clone for Modal<B> {
    fn clone(&self) -> Self {
        Modal {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<B: Backend> Modal<B> {
    /// Merges a dynamic partial configuration over the defaults and mounts
    /// the result. Nothing is attached if the configuration is rejected.
    pub fn new(backend: Rc<B>, partial: Option<&Value>) -> Result<Self, ModalError> {
        let config = Config::from_partials(&[partial])?;
        Self::with_config(backend, config)
    }

    pub fn with_patch(backend: Rc<B>, patch: ConfigPatch) -> Result<Self, ModalError> {
        Self::with_config(backend, Config::from_patch(patch))
    }

    pub fn with_config(backend: Rc<B>, config: Config) -> Result<Self, ModalError> {
        let modal = Modal {
            shared: Rc::new(Shared {
                backend,
                config,
                state: Cell::new(ModalState::Open),
                mounted: RefCell::new(None),
                timer: RefCell::new(None),
                on_close: RefCell::new(None),
            }),
        };
        modal.mount()?;
        Ok(modal)
    }

    pub fn alert(
        backend: Rc<B>,
        variant: Variant,
        message: impl Into<String>,
        title: Option<String>,
        closable: Option<bool>,
    ) -> Result<Self, ModalError> {
        Self::with_patch(backend, ConfigPatch::alert(variant, message, title, closable))
    }

    pub fn success(backend: Rc<B>, message: impl Into<String>, title: Option<String>, closable: Option<bool>) -> Result<Self, ModalError> {
        Self::alert(backend, Variant::Success, message, title, closable)
    }

    pub fn warning(backend: Rc<B>, message: impl Into<String>, title: Option<String>, closable: Option<bool>) -> Result<Self, ModalError> {
        Self::alert(backend, Variant::Warning, message, title, closable)
    }

    pub fn danger(backend: Rc<B>, message: impl Into<String>, title: Option<String>, closable: Option<bool>) -> Result<Self, ModalError> {
        Self::alert(backend, Variant::Danger, message, title, closable)
    }

    pub fn light(backend: Rc<B>, message: impl Into<String>, title: Option<String>, closable: Option<bool>) -> Result<Self, ModalError> {
        Self::alert(backend, Variant::Light, message, title, closable)
    }

    pub fn dark(backend: Rc<B>, message: impl Into<String>, title: Option<String>, closable: Option<bool>) -> Result<Self, ModalError> {
        Self::alert(backend, Variant::Dark, message, title, closable)
    }

    /// Loading dialog: no header and no close affordance, closed from code.
    pub fn loading(backend: Rc<B>, message: impl Into<String>, spinner: Option<SpinnerKind>) -> Result<Self, ModalError> {
        Self::with_patch(backend, ConfigPatch::loading(message, spinner))
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    pub fn state(&self) -> ModalState {
        self.shared.state.get()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.config.is_loading()
    }

    pub fn is_dismissible(&self) -> bool {
        self.shared.config.is_dismissible()
    }

    /// Whether both handles refer to the same modal.
    pub fn ptr_eq(&self, other: &Modal<B>) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    /// Backdrop element, until teardown.
    pub fn backdrop(&self) -> Option<B::Element> {
        self.shared.mounted.borrow().as_ref().map(|m| m.backdrop.clone())
    }

    /// Dialog element, until teardown.
    pub fn dialog(&self) -> Option<B::Element> {
        self.shared.mounted.borrow().as_ref().map(|m| m.dialog.clone())
    }

    /// Replaces the close callback. The callback in place when teardown
    /// completes is called once, with this modal.
    pub fn set_on_close<F>(&self, callback: F)
    where
        F: FnMut(&Modal<B>) + 'static,
    {
        *self.shared.on_close.borrow_mut() = Some(Box::new(callback));
    }

    /// Starts the exit transition and schedules teardown.
    ///
    /// Only the first successful call on an open modal has an effect. If the
    /// teardown cannot be scheduled the modal stays open and the call may be
    /// retried.
    pub fn close(&self) -> Result<(), ModalError> {
        if self.state() != ModalState::Open {
            debug!("Ignoring close of a {:?} modal", self.state());
            return Ok(());
        }

        let backend = &self.shared.backend;
        let shared = Rc::clone(&self.shared);
        let timer = backend.schedule(TEARDOWN_DELAY, Box::new(move || Modal { shared }.teardown()))?;
        *self.shared.timer.borrow_mut() = Some(timer);
        self.shared.state.set(ModalState::Closing);
        debug!("Closing {} modal, teardown in {:?}", self.shared.config.variant, TEARDOWN_DELAY);

        if let Some(mounted) = self.shared.mounted.borrow().as_ref() {
            for (element, role) in [(&mounted.backdrop, Role::Backdrop), (&mounted.dialog, Role::Dialog)] {
                if let Err(e) = backend.swap_class(element, role.enter_class(), role.exit_class()) {
                    warn!("Failed to start {:?} exit transition: {}", role, e);
                }
            }
        }

        Ok(())
    }

    /// Tears the modal down immediately, cancelling a pending close.
    /// The close callback is dropped without being called.
    pub fn dispose(&self) {
        if self.state() == ModalState::Closed {
            return;
        }

        if let Some(timer) = self.shared.timer.borrow_mut().take() {
            self.shared.backend.cancel(timer);
        }
        self.unmount();
        self.shared.state.set(ModalState::Closed);
        let callback = self.shared.on_close.borrow_mut().take();
        drop(callback);
        debug!("Disposed {} modal", self.shared.config.variant);
    }

    fn mount(&self) -> Result<(), ModalError> {
        let backend = &self.shared.backend;

        let backdrop = backend.attach(&Fragment::backdrop(), None)?;

        let dialog_fragment = Fragment::dialog(&self.shared.config);
        let on_close = dialog_fragment.close_selector.map(|_| self.close_handler());
        let dialog = match backend.attach(&dialog_fragment, on_close) {
            Ok(dialog) => dialog,
            Err(e) => {
                warn!("Failed to attach modal dialog, removing its backdrop: {}", e);
                backend.detach(&backdrop);
                return Err(e);
            }
        };

        *self.shared.mounted.borrow_mut() = Some(Mounted { backdrop, dialog });
        debug!("Opened {} modal", self.shared.config.variant);
        Ok(())
    }

    fn close_handler(&self) -> Box<dyn Fn()> {
        let weak = Rc::downgrade(&self.shared);
        Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                if let Err(e) = (Modal { shared }).close() {
                    warn!("Failed to close modal: {}", e);
                }
            }
        })
    }

    fn unmount(&self) {
        let mounted = self.shared.mounted.borrow_mut().take();
        if let Some(mounted) = mounted {
            self.shared.backend.detach(&mounted.backdrop);
            self.shared.backend.detach(&mounted.dialog);
        }
    }

    fn teardown(&self) {
        self.shared.timer.borrow_mut().take();
        self.unmount();
        self.shared.state.set(ModalState::Closed);
        debug!("Closed {} modal", self.shared.config.variant);

        let callback = self.shared.on_close.borrow_mut().take();
        if let Some(mut callback) = callback {
            callback(self);
        }
    }
}

impl<B: Backend> fmt::Debug for Modal<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modal")
            .field("config", &self.shared.config)
            .field("state", &self.state())
            .finish()
    }
}
