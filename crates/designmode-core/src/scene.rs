//! The scene graph slice the editor operates on.
//!
//! A scene owns two ordered child lists: the window layer and the root
//! children (pictures and other sprites). Persistence identity is positional
//! within those lists, so attach order matters and must match the host's
//! draw order.

use crate::config::{DesignConfig, SceneExtras};
use crate::container::{Container, ContainerRole};
use crate::formula::EvalContext;
use crate::history::{LayerKind, SlotRef};
use crate::platform::Platform;
use crate::store::{LayoutStore, Storage};
use kurbo::{Point, Rect, Size};

/// Class name used as the persistence parent for window-layer children.
pub const WINDOW_LAYER_NAME: &str = "WindowLayer";

/// Class names given to containers built from the scene extras config.
pub const EXTRA_PICTURE_CLASS: &str = "Picture";
pub const EXTRA_WINDOW_CLASS: &str = "CustomWindow";

/// Initial width of a configured extra window.
const EXTRA_WINDOW_WIDTH: f64 = 320.0;

/// One named screen with its editable containers.
#[derive(Debug)]
pub struct Scene {
    name: String,
    /// Window layer children, in draw order (back to front).
    pub windows: Vec<Container>,
    /// Direct scene children, in draw order.
    pub children: Vec<Container>,
    frame_claimed: bool,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            windows: Vec::new(),
            children: Vec::new(),
            frame_claimed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Persistence parent name for one of the child lists.
    pub fn parent_name(&self, layer: LayerKind) -> &str {
        match layer {
            LayerKind::Windows => WINDOW_LAYER_NAME,
            LayerKind::Root => &self.name,
        }
    }

    /// Attach a window to the window layer, restoring any persisted record
    /// for its slot and locking it when one applies.
    pub fn attach_window<S: Storage>(
        &mut self,
        mut container: Container,
        store: &LayoutStore<S>,
    ) -> SlotRef {
        let slot = SlotRef {
            layer: LayerKind::Windows,
            index: self.windows.len(),
        };
        self.restore(&mut container, slot, store);
        self.windows.push(container);
        slot
    }

    /// Attach a container to the scene root, restoring any persisted record.
    pub fn attach_child<S: Storage>(
        &mut self,
        mut container: Container,
        store: &LayoutStore<S>,
    ) -> SlotRef {
        let slot = SlotRef {
            layer: LayerKind::Root,
            index: self.children.len(),
        };
        self.restore(&mut container, slot, store);
        self.children.push(container);
        slot
    }

    fn restore<S: Storage>(&self, container: &mut Container, slot: SlotRef, store: &LayoutStore<S>) {
        let parent = self.parent_name(slot.layer);
        if let Some(record) = store.lookup(&self.name, parent, slot.index, container.class_name()) {
            container.apply_record(record);
            container.set_locked(true);
        }
    }

    /// Build the extra pictures and windows declared for this scene.
    pub fn attach_extras<S: Storage>(
        &mut self,
        extras: &SceneExtras,
        config: &DesignConfig,
        store: &LayoutStore<S>,
    ) {
        let ctx = EvalContext::new(config.screen);
        for picture in &extras.pictures {
            if picture.file.is_empty() {
                continue;
            }
            let mut container =
                Container::image(EXTRA_PICTURE_CLASS, Point::ZERO, Size::ZERO, &picture.file);
            container.switch_id = picture.switch_id;
            self.attach_child(container, store);
        }
        for window in &extras.windows {
            if window.lines.is_empty() {
                continue;
            }
            let mut container = Container::window(
                EXTRA_WINDOW_CLASS,
                Rect::from_origin_size(Point::ZERO, Size::new(EXTRA_WINDOW_WIDTH, 0.0)),
            );
            if let crate::container::ContainerKind::Window(props) = &mut container.kind {
                props.line_count = window.lines.len() as u32;
            }
            container.size.height = container.fitting_height(window.lines.len() as u32, config, &ctx);
            container.switch_id = window.switch_id;
            self.attach_window(container, store);
        }
    }

    /// Evaluate the visibility switches of configured extras.
    pub fn update_extras_visibility(&mut self, platform: &dyn Platform) {
        for container in self.windows.iter_mut().chain(self.children.iter_mut()) {
            if container.switch_id > 0 {
                container.visible = platform.switch_value(container.switch_id);
            }
        }
    }

    pub fn get(&self, slot: SlotRef) -> Option<&Container> {
        match slot.layer {
            LayerKind::Windows => self.windows.get(slot.index),
            LayerKind::Root => self.children.get(slot.index),
        }
    }

    pub fn get_mut(&mut self, slot: SlotRef) -> Option<&mut Container> {
        match slot.layer {
            LayerKind::Windows => self.windows.get_mut(slot.index),
            LayerKind::Root => self.children.get_mut(slot.index),
        }
    }

    /// Find the first window carrying the given role.
    pub fn find_role(&self, role: ContainerRole) -> Option<SlotRef> {
        self.windows
            .iter()
            .position(|c| c.role == Some(role))
            .map(|index| SlotRef {
                layer: LayerKind::Windows,
                index,
            })
    }

    pub(crate) fn frame_available(&self) -> bool {
        !self.frame_claimed
    }

    pub(crate) fn claim_frame(&mut self) {
        self.frame_claimed = true;
    }

    pub(crate) fn reset_frame_claim(&mut self) {
        self.frame_claimed = false;
    }
}
