use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::backends::backend::Backend;
use crate::error::ModalError;
use crate::markup::{Fragment, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedElement {
    pub id: ElementId,
    pub role: Role,
    pub classes: Vec<String>,
    pub inner_html: String,
}

impl MountedElement {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn outer_html(&self) -> String {
        format!("<div class=\"{}\">{}</div>", self.classes.join(" "), self.inner_html)
    }
}

struct PendingTimer {
    id: u64,
    due: Duration,
    task: Box<dyn FnOnce()>,
}

/// Headless surface with a manual clock.
///
/// Elements live in attach order; scheduled tasks only run when the clock is
/// moved forward with [`MemoryBackend::advance`].
pub struct MemoryBackend {
    has_root: bool,
    attaches_left: Option<Cell<usize>>,
    next_id: Cell<u64>,
    elements: RefCell<Vec<MountedElement>>,
    close_handlers: RefCell<HashMap<ElementId, Rc<dyn Fn()>>>,
    now: Cell<Duration>,
    timers: RefCell<Vec<PendingTimer>>,
}

impl MemoryBackend {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::build(true, None))
    }

    /// A surface without a mount root: every attach fails.
    pub fn without_root() -> Rc<Self> {
        Rc::new(Self::build(false, None))
    }

    /// A surface whose container goes away after `attaches` successful
    /// attaches: every later attach fails as if the root were missing.
    pub fn failing_after(attaches: usize) -> Rc<Self> {
        Rc::new(Self::build(true, Some(attaches)))
    }

    fn build(has_root: bool, attaches_left: Option<usize>) -> Self {
        MemoryBackend {
            has_root,
            attaches_left: attaches_left.map(Cell::new),
            next_id: Cell::new(1),
            elements: RefCell::new(Vec::new()),
            close_handlers: RefCell::new(HashMap::new()),
            now: Cell::new(Duration::ZERO),
            timers: RefCell::new(Vec::new()),
        }
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    pub fn now(&self) -> Duration {
        self.now.get()
    }

    pub fn live_count(&self) -> usize {
        self.elements.borrow().len()
    }

    pub fn is_live(&self, id: ElementId) -> bool {
        self.elements.borrow().iter().any(|e| e.id == id)
    }

    pub fn element(&self, id: ElementId) -> Option<MountedElement> {
        self.elements.borrow().iter().find(|e| e.id == id).cloned()
    }

    pub fn elements(&self) -> Vec<MountedElement> {
        self.elements.borrow().clone()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Simulates a click on the close affordance of `id`.
    /// Returns whether the element had one.
    pub fn click_close(&self, id: ElementId) -> bool {
        let handler = self.close_handlers.borrow().get(&id).cloned();
        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    /// Moves the clock forward, running due tasks in deadline order.
    pub fn advance(&self, delay: Duration) {
        let target = self.now.get() + delay;

        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let due = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.id))
                    .map(|(index, _)| index);
                due.map(|index| timers.remove(index))
            };

            match next {
                Some(timer) => {
                    self.now.set(timer.due);
                    (timer.task)();
                }
                None => break,
            }
        }

        self.now.set(target);
    }
}

impl fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("now", &self.now.get())
            .field("elements", &self.elements.borrow())
            .field("pending_timers", &self.timers.borrow().len())
            .finish()
    }
}

impl Backend for MemoryBackend {
    type Element = ElementId;
    type Timer = TimerId;

    fn attach(&self, fragment: &Fragment, on_close: Option<Box<dyn Fn()>>) -> Result<ElementId, ModalError> {
        if !self.has_root {
            return Err(ModalError::MountTargetMissing);
        }
        if let Some(left) = &self.attaches_left {
            if left.get() == 0 {
                return Err(ModalError::MountTargetMissing);
            }
            left.set(left.get() - 1);
        }

        let id = ElementId(self.next_id());
        self.elements.borrow_mut().push(MountedElement {
            id,
            role: fragment.role,
            classes: fragment.classes.clone(),
            inner_html: fragment.inner_html.clone(),
        });
        if let Some(handler) = on_close {
            self.close_handlers.borrow_mut().insert(id, Rc::from(handler));
        }

        Ok(id)
    }

    fn detach(&self, element: &ElementId) {
        self.elements.borrow_mut().retain(|e| e.id != *element);
        self.close_handlers.borrow_mut().remove(element);
    }

    fn swap_class(&self, element: &ElementId, remove: &str, add: &str) -> Result<(), ModalError> {
        let mut elements = self.elements.borrow_mut();
        let mounted = elements
            .iter_mut()
            .find(|e| e.id == *element)
            .ok_or_else(|| ModalError::Backend(format!("element {:?} is not mounted", element)))?;

        mounted.classes.retain(|c| c != remove);
        if !mounted.has_class(add) {
            mounted.classes.push(add.to_string());
        }
        Ok(())
    }

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Result<TimerId, ModalError> {
        let id = self.next_id();
        self.timers.borrow_mut().push(PendingTimer {
            id,
            due: self.now.get() + delay,
            task,
        });
        Ok(TimerId(id))
    }

    fn cancel(&self, timer: TimerId) {
        let cancelled = {
            let mut timers = self.timers.borrow_mut();
            timers
                .iter()
                .position(|t| t.id == timer.0)
                .map(|index| timers.remove(index))
        };
        // Dropped outside the borrow: the task may own values whose drop touches the backend.
        drop(cancelled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_timers_run_in_deadline_order() {
        let backend = MemoryBackend::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (label, ms) in [("late", 30), ("early", 10), ("mid", 20)] {
            let log = log.clone();
            backend
                .schedule(Duration::from_millis(ms), Box::new(move || log.borrow_mut().push(label)))
                .unwrap();
        }

        backend.advance(Duration::from_millis(15));
        assert_eq!(*log.borrow(), vec!["early"]);

        backend.advance(Duration::from_millis(100));
        assert_eq!(*log.borrow(), vec!["early", "mid", "late"]);
        assert_eq!(backend.now(), Duration::from_millis(115));
    }

    #[test]
    fn test_cancelled_timer_never_runs() {
        let backend = MemoryBackend::new();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();

        let timer = backend
            .schedule(Duration::from_millis(5), Box::new(move || flag.set(true)))
            .unwrap();
        backend.cancel(timer);
        backend.advance(Duration::from_secs(1));

        assert!(!fired.get());
        assert_eq!(backend.pending_timers(), 0);
    }

    #[test]
    fn test_attach_and_detach() {
        let backend = MemoryBackend::new();
        let id = backend.attach(&Fragment::backdrop(), None).unwrap();

        assert!(backend.is_live(id));
        assert!(!backend.click_close(id));

        backend.swap_class(&id, "fade-in-fwd", "fade-out").unwrap();
        assert_eq!(backend.element(id).unwrap().classes, vec!["modal-backdrop", "fade-out"]);

        backend.detach(&id);
        assert_eq!(backend.live_count(), 0);
        assert!(backend.swap_class(&id, "a", "b").is_err());
    }

    #[test]
    fn test_root_goes_missing_after_attaches() {
        let backend = MemoryBackend::failing_after(2);
        let first = backend.attach(&Fragment::backdrop(), None).unwrap();
        backend.attach(&Fragment::backdrop(), None).unwrap();
        backend.detach(&first);

        assert_eq!(
            backend.attach(&Fragment::backdrop(), None),
            Err(ModalError::MountTargetMissing)
        );
        assert_eq!(backend.live_count(), 1);
    }

    #[test]
    fn test_missing_root() {
        let backend = MemoryBackend::without_root();

        assert_eq!(
            backend.attach(&Fragment::backdrop(), None),
            Err(ModalError::MountTargetMissing)
        );
    }
}
