mod config;
mod error;
mod markup;
mod merge;
mod modal;

pub mod backends {
    pub mod backend;
    pub mod memory_backend;
}

pub use backends::backend::Backend;
pub use backends::memory_backend::{ElementId, MemoryBackend, MountedElement};
pub use config::{Config, ConfigPatch, SpinnerKind, Variant};
pub use error::ModalError;
pub use markup::{Fragment, Role};
pub use merge::{extend, Merge};
pub use modal::{Modal, ModalState, TEARDOWN_DELAY};

pub mod prelude {
    pub use super::{Backend, Config, ConfigPatch, Modal, ModalError, ModalState, SpinnerKind, Variant};
}
