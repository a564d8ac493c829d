use std::fmt::Debug;
use std::time::Duration;

use crate::error::ModalError;
use crate::markup::Fragment;

/// Presentation surface and timer source a modal mounts onto.
///
/// Implementations are single-threaded: tasks and close handlers run on the
/// same event loop that calls into the backend.
pub trait Backend: 'static {
    type Element: Clone + Debug + 'static;
    type Timer: Debug + 'static;

    /// Appends `fragment` to the surface. When `on_close` is given it must be
    /// invoked whenever the user activates `fragment.close_selector`.
    fn attach(&self, fragment: &Fragment, on_close: Option<Box<dyn Fn()>>) -> Result<Self::Element, ModalError>;

    fn detach(&self, element: &Self::Element);

    fn swap_class(&self, element: &Self::Element, remove: &str, add: &str) -> Result<(), ModalError>;

    /// Runs `task` once after `delay`, unless cancelled first.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Result<Self::Timer, ModalError>;

    fn cancel(&self, timer: Self::Timer);
}
