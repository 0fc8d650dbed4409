//! Design Mode Core Library
//!
//! Host-agnostic core for a runtime, in-game visual layout editor: drag,
//! snap and reconfigure screen containers while the game runs, persist the
//! edits as structured records, and replay them deterministically on future
//! runs. Rendering, input hardware and game rules stay on the host side of
//! the [`platform::Platform`] seam.

pub mod config;
pub mod container;
mod editor;
pub mod formula;
pub mod history;
pub mod input;
pub mod platform;
pub mod scene;
pub mod session;
pub mod snap;
pub mod store;

pub use config::{DesignConfig, DeviceClass, PictureDecl, SceneExtras, WindowDecl};
pub use container::{
    Container, ContainerCategory, ContainerKind, ContainerRole, ImageProps, OpenState, WindowProps,
};
pub use formula::EvalContext;
pub use history::{ChangeStack, LayerKind, SlotRef};
pub use input::{EditKey, InputState, KeyEvent, Modifiers, PointerButton, PointerEvent};
pub use platform::{Cue, NullPlatform, Platform};
pub use scene::Scene;
pub use session::{LayoutCommand, Session, INFO_HELP};
pub use snap::{SnapModifiers, SNAP_THRESHOLD};
pub use store::{
    FileStorage, LayoutDocument, LayoutRecord, LayoutStore, MemoryStorage, Storage, StorageError,
};
