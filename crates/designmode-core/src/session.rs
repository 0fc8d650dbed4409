//! Per-scene editor session: status line, accelerators, frame dispatch and
//! the outward command surface.
//!
//! The session owns the layout store and the change stack; the host owns the
//! scene and the input state and calls [`Session::update`] once per frame.
//! Global commands route through explicit session state (last position, last
//! addressed container) instead of ambient globals.

use crate::config::DesignConfig;
use crate::container::ContainerRole;
use crate::editor;
use crate::formula::EvalContext;
use crate::history::{ChangeStack, LayerKind, SlotRef};
use crate::input::{EditKey, InputState};
use crate::platform::{Cue, Platform};
use crate::scene::Scene;
use crate::store::{LayoutStore, Storage};
use kurbo::{Point, Rect};

/// Static lead-in of the status line.
pub const INFO_HELP: &str =
    "Design mode. Drag to arrange, right click to toggle backgrounds, number keys to edit properties. ";

/// Operations callable by external scripted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutCommand {
    LockMessage,
    UnlockMessage,
    LockChoice,
    UnlockChoice,
}

/// The editor session for the active scene.
pub struct Session<S: Storage> {
    config: DesignConfig,
    store: LayoutStore<S>,
    changes: ChangeStack,
    last_position: Option<Point>,
    last_addressed: Option<SlotRef>,
    position_override: Option<SlotRef>,
    info_window: String,
    info_extend: String,
    control_number: i64,
    copy_count: u64,
}

impl<S: Storage> Session<S> {
    /// Open the layout document and start a session.
    pub fn new(config: DesignConfig, storage: S, platform: &dyn Platform) -> Self {
        let device = config.device_class(platform.is_mobile_device());
        let store = LayoutStore::open(storage, device, config.auto_save);
        if config.design_mode {
            log::info!("design mode active");
        }
        Self {
            config,
            store,
            changes: ChangeStack::new(),
            last_position: None,
            last_addressed: None,
            position_override: None,
            info_window: String::new(),
            info_extend: String::new(),
            control_number: 0,
            copy_count: 0,
        }
    }

    pub fn config(&self) -> &DesignConfig {
        &self.config
    }

    /// The layout store, for attaching containers to a scene.
    pub fn store(&self) -> &LayoutStore<S> {
        &self.store
    }

    /// Rolling status line: help text plus the latest change descriptions.
    pub fn status_line(&self) -> String {
        format!("{}{}{}", INFO_HELP, self.info_window, self.info_extend)
    }

    /// Net edit counter (incremented on edits, decremented on undo); display
    /// and debugging only.
    pub fn operation_count(&self) -> i64 {
        self.control_number
    }

    pub fn change_count(&self) -> usize {
        self.changes.len()
    }

    pub fn last_addressed(&self) -> Option<SlotRef> {
        self.last_addressed
    }

    /// Begin a scene: clears the change stack and per-scene state, builds
    /// the scene with its configured extras.
    pub fn enter_scene(&mut self, name: &str) -> Scene {
        self.changes.clear();
        self.last_addressed = None;
        self.position_override = None;
        log::debug!("entering scene {name}");
        let mut scene = Scene::new(name);
        if let Some(extras) = self.config.scenes.get(name).cloned() {
            scene.attach_extras(&extras, &self.config, &self.store);
        }
        scene
    }

    /// Per-frame tick. Call after feeding the frame's events into `input`.
    pub fn update(&mut self, scene: &mut Scene, input: &InputState, platform: &mut dyn Platform) {
        scene.update_extras_visibility(platform);
        if !self.config.design_mode {
            return;
        }
        self.process_accelerators(scene, input, platform);
        self.process_containers(scene, input, platform);
    }

    /// Pop the change stack and restore positionally.
    ///
    /// Returns whether a restoration happened; an empty stack or a vanished
    /// slot is a silent no-op. The entry is consumed either way.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        let Some(entry) = self.changes.pop() else {
            return false;
        };
        let Some(container) = scene.get_mut(entry.slot) else {
            return false;
        };
        container.apply_record(&entry.snapshot);
        self.persist_slot(scene, entry.slot);
        true
    }

    /// Scripted position command for the last addressed container; bypasses
    /// the position lock and is reported by the next frame's tick.
    pub fn move_last_addressed(&mut self, scene: &mut Scene, x: f64, y: f64) {
        let Some(slot) = self.last_addressed else {
            self.set_info(
                "This operation is invalid because no container has been addressed.",
                0,
            );
            return;
        };
        let Some(container) = scene.get_mut(slot) else {
            return;
        };
        container.force_position(Point::new(x, y));
        self.position_override = Some(slot);
    }

    /// Execute one of the outward scripted commands.
    pub fn execute(&mut self, scene: &mut Scene, command: LayoutCommand) {
        let role = match command {
            LayoutCommand::LockMessage | LayoutCommand::UnlockMessage => ContainerRole::Message,
            LayoutCommand::LockChoice | LayoutCommand::UnlockChoice => ContainerRole::Choice,
        };
        let Some(slot) = scene.find_role(role) else {
            log::debug!("no {role:?} window in the current scene");
            return;
        };
        let Some(container) = scene.get_mut(slot) else {
            return;
        };
        match command {
            LayoutCommand::LockMessage | LayoutCommand::LockChoice => container.lock_position(),
            LayoutCommand::UnlockMessage | LayoutCommand::UnlockChoice => {
                container.unlock_position()
            }
        }
    }

    /// Save, copy, undo and reset accelerators, all behind the precision
    /// modifier.
    fn process_accelerators(
        &mut self,
        scene: &mut Scene,
        input: &InputState,
        platform: &mut dyn Platform,
    ) {
        if !input.modifiers.precision {
            return;
        }
        if input.is_key_just_pressed(EditKey::Copy) {
            platform.play_cue(Cue::Ok);
            if let Some(p) = self.last_position {
                let (axis, value) = if self.copy_count % 2 == 0 {
                    ("X", p.x)
                } else {
                    ("Y", p.y)
                };
                let text = value.to_string();
                platform.set_clipboard(&text);
                let msg = format!("{axis} coordinate [{text}] copied to the clipboard.");
                self.set_info(&msg, 0);
                self.copy_count += 1;
            }
        }
        if input.is_key_just_pressed(EditKey::Save) {
            platform.play_cue(Cue::Save);
            if let Err(e) = self.store.write() {
                log::error!("failed to save the layout document: {e}");
            } else {
                self.set_info("All changes have been saved.", 0);
            }
        }
        if input.is_key_just_pressed(EditKey::Confirm) {
            if input.modifiers.free {
                // Destructive escape hatch: drop the scene's records and
                // rebuild from scratch. Not undoable.
                if let Err(e) = self.store.clear_scene(scene.name()) {
                    log::error!("failed to reset the scene layout: {e}");
                }
                self.changes.clear();
                platform.request_reload();
            } else if self.undo(scene) {
                platform.play_cue(Cue::Cancel);
                self.set_info("The last change has been restored.", -1);
            }
        }
    }

    /// Walk the scene topmost-first until one container claims the frame.
    fn process_containers(
        &mut self,
        scene: &mut Scene,
        input: &InputState,
        platform: &mut dyn Platform,
    ) {
        scene.reset_frame_claim();
        let ctx = EvalContext::new(self.config.screen);
        if self.process_layer(scene, LayerKind::Windows, input, platform, &ctx) {
            return;
        }
        self.process_layer(scene, LayerKind::Root, input, platform, &ctx);
    }

    fn process_layer(
        &mut self,
        scene: &mut Scene,
        layer: LayerKind,
        input: &InputState,
        platform: &mut dyn Platform,
        ctx: &EvalContext,
    ) -> bool {
        let len = match layer {
            LayerKind::Windows => scene.windows.len(),
            LayerKind::Root => scene.children.len(),
        };
        for index in (0..len).rev() {
            let slot = SlotRef { layer, index };
            if self.tick_container(scene, slot, input, platform, ctx) {
                return true;
            }
        }
        false
    }

    fn tick_container(
        &mut self,
        scene: &mut Scene,
        slot: SlotRef,
        input: &InputState,
        platform: &mut dyn Platform,
        ctx: &EvalContext,
    ) -> bool {
        let (pre_snapshot, candidates) = {
            let list = match slot.layer {
                LayerKind::Windows => &scene.windows,
                LayerKind::Root => &scene.children,
            };
            let target = &list[slot.index];
            let category = target.category();
            let candidates: Vec<Rect> = list
                .iter()
                .enumerate()
                .filter(|(i, c)| {
                    *i != slot.index
                        && c.category() == category
                        && c.is_interactable()
                        && !c.is_holding()
                })
                .map(|(_, c)| c.rect())
                .collect();
            (target.capture_record(), candidates)
        };

        let position_override = self.position_override == Some(slot);
        let effects = {
            let tc = editor::TickContext {
                config: &self.config,
                ctx,
                candidates: &candidates,
                position_override,
                frame_available: scene.frame_available(),
            };
            let Some(container) = scene.get_mut(slot) else {
                return false;
            };
            editor::tick(container, input, platform, &tc)
        };

        if position_override && effects.claimed {
            self.position_override = None;
        }
        if effects.push_undo {
            self.changes.push(slot, pre_snapshot);
        }
        if let Some(cue) = effects.cue {
            platform.play_cue(cue);
        }
        if let Some(p) = effects.position_info {
            self.last_position = Some(p);
            self.info_window = format!("X:[{}] Y:[{}]", p.x, p.y);
            if effects.committed_move {
                let msg = format!("The position has been changed. {}", self.info_window);
                self.set_info(&msg, 1);
            }
        }
        if effects.opacity_toggled {
            self.set_info("The background visibility has been changed.", 1);
        }
        if let Some((label, value)) = &effects.property_changed {
            let msg = format!("{label} has been changed to [{value}].");
            self.set_info(&msg, 1);
        }
        if effects.persist {
            self.persist_slot(scene, slot);
        }
        if effects.background_invalid && self.undo(scene) {
            self.set_info("The image was not found, so the change has been reverted.", -1);
        }
        if effects.highlight_gained {
            scene.claim_frame();
            self.last_addressed = Some(slot);
        }
        effects.claimed
    }

    /// Write one container's record through the store.
    fn persist_slot(&mut self, scene: &Scene, slot: SlotRef) {
        let Some(container) = scene.get(slot) else {
            return;
        };
        let parent = scene.parent_name(slot.layer);
        if let Err(e) = self.store.save_container(
            scene.name(),
            parent,
            slot.index,
            container.class_name(),
            container.capture_record(),
        ) {
            log::error!("failed to persist {parent}[{}]: {e}", slot.index);
        }
    }

    /// Update the status tail and the edit counter.
    fn set_info(&mut self, value: &str, delta: i64) {
        self.control_number += delta;
        self.info_extend = format!(" {value}");
        if delta != 0 {
            let shown = self.control_number + i64::from(delta < 0);
            log::info!("{shown} : {value}");
            if self.store.auto_save() {
                log::debug!("the change has been written by auto-save");
            }
        } else {
            log::info!("{value}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Container, ContainerKind};
    use crate::input::{KeyEvent, Modifiers, PointerButton, PointerEvent};
    use crate::platform::NullPlatform;
    use crate::scene::WINDOW_LAYER_NAME;
    use crate::store::MemoryStorage;
    use kurbo::Size;

    fn session(auto_save: bool) -> Session<MemoryStorage> {
        let config = DesignConfig {
            auto_save,
            ..Default::default()
        };
        Session::new(config, MemoryStorage::new(), &NullPlatform::new())
    }

    fn window_at(x: f64, y: f64) -> Container {
        Container::window(
            "TestWindow",
            Rect::from_origin_size(Point::new(x, y), Size::new(200.0, 100.0)),
        )
    }

    fn frame(
        session: &mut Session<MemoryStorage>,
        scene: &mut Scene,
        input: &mut InputState,
        platform: &mut NullPlatform,
        events: Vec<PointerEvent>,
    ) {
        input.begin_frame();
        for event in events {
            input.handle_pointer_event(event);
        }
        session.update(scene, input, platform);
    }

    fn drag(
        session: &mut Session<MemoryStorage>,
        scene: &mut Scene,
        input: &mut InputState,
        platform: &mut NullPlatform,
        from: Point,
        to: Point,
    ) {
        frame(
            session,
            scene,
            input,
            platform,
            vec![PointerEvent::Down {
                position: from,
                button: PointerButton::Primary,
            }],
        );
        frame(
            session,
            scene,
            input,
            platform,
            vec![PointerEvent::Move { position: to }],
        );
        frame(
            session,
            scene,
            input,
            platform,
            vec![PointerEvent::Up {
                position: to,
                button: PointerButton::Primary,
            }],
        );
    }

    #[test]
    fn test_drag_commits_and_undo_restores_exactly() {
        let mut session = session(false);
        let mut scene = session.enter_scene("MenuScene");
        scene.attach_window(window_at(100.0, 100.0), session.store());
        let mut input = InputState::new();
        let mut platform = NullPlatform::new();

        let before = scene.windows[0].capture_record();
        drag(
            &mut session,
            &mut scene,
            &mut input,
            &mut platform,
            Point::new(150.0, 150.0),
            Point::new(450.0, 350.0),
        );

        assert_eq!(scene.windows[0].position(), Point::new(400.0, 300.0));
        assert_eq!(session.change_count(), 1);
        assert_eq!(session.operation_count(), 1);
        // Committed through the store.
        assert!(session
            .store()
            .lookup("MenuScene", WINDOW_LAYER_NAME, 0, "TestWindow")
            .is_some());

        assert!(session.undo(&mut scene));
        let after_undo = scene.windows[0].capture_record();
        assert_eq!(after_undo, before);
        assert_eq!(session.change_count(), 0);
    }

    #[test]
    fn test_undo_on_empty_stack_is_a_no_op() {
        let mut session = session(false);
        let mut scene = session.enter_scene("MenuScene");
        assert!(!session.undo(&mut scene));
    }

    #[test]
    fn test_scene_transition_clears_the_stack() {
        let mut session = session(false);
        let mut scene = session.enter_scene("SceneA");
        scene.attach_window(window_at(100.0, 100.0), session.store());
        let mut input = InputState::new();
        let mut platform = NullPlatform::new();

        drag(
            &mut session,
            &mut scene,
            &mut input,
            &mut platform,
            Point::new(150.0, 150.0),
            Point::new(450.0, 350.0),
        );
        assert_eq!(session.change_count(), 1);

        let mut scene_b = session.enter_scene("SceneB");
        assert_eq!(session.change_count(), 0);
        assert!(!session.undo(&mut scene_b));
    }

    #[test]
    fn test_undo_restoration_is_positional() {
        let mut session = session(false);
        let mut scene = session.enter_scene("MenuScene");
        scene.attach_window(window_at(100.0, 100.0), session.store());
        let mut input = InputState::new();
        let mut platform = NullPlatform::new();

        drag(
            &mut session,
            &mut scene,
            &mut input,
            &mut platform,
            Point::new(150.0, 150.0),
            Point::new(450.0, 350.0),
        );

        // The slot's occupant changes between push and pop; the snapshot
        // lands on the new occupant. Documented limitation of positional
        // addressing.
        scene.windows[0] = window_at(700.0, 500.0);
        assert!(session.undo(&mut scene));
        assert_eq!(scene.windows[0].position(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_topmost_window_wins_the_grab() {
        let mut session = session(false);
        let mut scene = session.enter_scene("MenuScene");
        scene.attach_window(window_at(100.0, 100.0), session.store());
        scene.attach_window(window_at(150.0, 120.0), session.store());
        let mut input = InputState::new();
        let mut platform = NullPlatform::new();

        // The press lands inside both; the later-attached (topmost) window
        // takes the hold and the scan short-circuits.
        frame(
            &mut session,
            &mut scene,
            &mut input,
            &mut platform,
            vec![PointerEvent::Down {
                position: Point::new(200.0, 150.0),
                button: PointerButton::Primary,
            }],
        );
        assert!(scene.windows[1].is_holding());
        assert!(!scene.windows[0].is_holding());
    }

    #[test]
    fn test_drag_snaps_to_sibling_edge() {
        let mut session = session(false);
        let mut scene = session.enter_scene("MenuScene");
        scene.attach_window(window_at(0.0, 0.0), session.store());
        scene.attach_window(window_at(400.0, 0.0), session.store());
        let mut input = InputState::new();
        let mut platform = NullPlatform::new();

        // Drag the top window to 5px right of the bottom one's right edge:
        // it snaps to x=200.
        drag(
            &mut session,
            &mut scene,
            &mut input,
            &mut platform,
            Point::new(410.0, 10.0),
            Point::new(215.0, 10.0),
        );
        assert_eq!(scene.windows[1].position().x, 200.0);
    }

    #[test]
    fn test_save_accelerator_writes_document() {
        let mut session = session(false);
        let mut scene = session.enter_scene("MenuScene");
        scene.attach_window(window_at(100.0, 100.0), session.store());
        let mut input = InputState::new();
        let mut platform = NullPlatform::new();

        drag(
            &mut session,
            &mut scene,
            &mut input,
            &mut platform,
            Point::new(150.0, 150.0),
            Point::new(450.0, 350.0),
        );
        // Nothing on disk yet without autosave.
        assert!(session.store().storage().load("ContainerProperties.json").is_err());

        input.begin_frame();
        input.set_modifiers(Modifiers {
            precision: true,
            free: false,
        });
        input.handle_key_event(KeyEvent::Pressed(EditKey::Save));
        session.update(&mut scene, &input, &mut platform);

        let saved = session.store().storage().load("ContainerProperties.json").unwrap();
        assert!(saved.get("MenuScene", WINDOW_LAYER_NAME, "0,TestWindow").is_some());
        assert!(platform.cues.contains(&Cue::Save));
    }

    #[test]
    fn test_undo_accelerator_pops_once() {
        let mut session = session(false);
        let mut scene = session.enter_scene("MenuScene");
        scene.attach_window(window_at(100.0, 100.0), session.store());
        let mut input = InputState::new();
        let mut platform = NullPlatform::new();

        drag(
            &mut session,
            &mut scene,
            &mut input,
            &mut platform,
            Point::new(150.0, 150.0),
            Point::new(450.0, 350.0),
        );
        assert_eq!(session.operation_count(), 1);

        input.begin_frame();
        input.set_modifiers(Modifiers {
            precision: true,
            free: false,
        });
        input.handle_key_event(KeyEvent::Pressed(EditKey::Confirm));
        session.update(&mut scene, &input, &mut platform);

        assert_eq!(scene.windows[0].position(), Point::new(100.0, 100.0));
        assert_eq!(session.operation_count(), 0);
        assert!(platform.cues.contains(&Cue::Cancel));
    }

    #[test]
    fn test_reset_accelerator_clears_scene_and_reloads() {
        let mut session = session(true);
        let mut scene = session.enter_scene("MenuScene");
        scene.attach_window(window_at(100.0, 100.0), session.store());
        let mut input = InputState::new();
        let mut platform = NullPlatform::new();

        drag(
            &mut session,
            &mut scene,
            &mut input,
            &mut platform,
            Point::new(150.0, 150.0),
            Point::new(450.0, 350.0),
        );
        assert!(session
            .store()
            .lookup("MenuScene", WINDOW_LAYER_NAME, 0, "TestWindow")
            .is_some());

        input.begin_frame();
        input.set_modifiers(Modifiers {
            precision: true,
            free: true,
        });
        input.handle_key_event(KeyEvent::Pressed(EditKey::Confirm));
        session.update(&mut scene, &input, &mut platform);

        assert!(session
            .store()
            .lookup("MenuScene", WINDOW_LAYER_NAME, 0, "TestWindow")
            .is_none());
        assert!(platform.reload_requested);
        // The reset is not undoable.
        assert_eq!(session.change_count(), 0);
        assert!(!session.undo(&mut scene));
    }

    #[test]
    fn test_copy_alternates_between_x_and_y() {
        let mut session = session(false);
        let mut scene = session.enter_scene("MenuScene");
        scene.attach_window(window_at(100.0, 100.0), session.store());
        let mut input = InputState::new();
        let mut platform = NullPlatform::new();

        drag(
            &mut session,
            &mut scene,
            &mut input,
            &mut platform,
            Point::new(150.0, 150.0),
            Point::new(450.0, 350.0),
        );

        for expected in ["400", "300", "400"] {
            input.begin_frame();
            input.set_modifiers(Modifiers {
                precision: true,
                free: false,
            });
            input.handle_key_event(KeyEvent::Pressed(EditKey::Copy));
            session.update(&mut scene, &input, &mut platform);
            assert_eq!(platform.clipboard.as_deref(), Some(expected));
            input.handle_key_event(KeyEvent::Released(EditKey::Copy));
        }
    }

    #[test]
    fn test_copy_without_a_position_does_nothing() {
        let mut session = session(false);
        let mut scene = session.enter_scene("MenuScene");
        let mut input = InputState::new();
        let mut platform = NullPlatform::new();

        input.begin_frame();
        input.set_modifiers(Modifiers {
            precision: true,
            free: false,
        });
        input.handle_key_event(KeyEvent::Pressed(EditKey::Copy));
        session.update(&mut scene, &input, &mut platform);
        assert!(platform.clipboard.is_none());
    }

    #[test]
    fn test_background_failure_rolls_back_without_permanent_write() {
        let mut session = session(true);
        let mut scene = session.enter_scene("MenuScene");
        scene.attach_window(window_at(100.0, 100.0), session.store());
        let mut input = InputState::new();
        let mut platform = NullPlatform::new();
        platform.prompt_reply = Some("ghost".to_string());
        platform.missing_pictures.insert("ghost".to_string());

        frame(
            &mut session,
            &mut scene,
            &mut input,
            &mut platform,
            vec![PointerEvent::Move {
                position: Point::new(150.0, 150.0),
            }],
        );
        input.begin_frame();
        input.handle_key_event(KeyEvent::Pressed(EditKey::Digit(8)));
        session.update(&mut scene, &input, &mut platform);

        // The edit was applied and reverted within the same logical step.
        let ContainerKind::Window(w) = &scene.windows[0].kind else {
            unreachable!()
        };
        assert!(w.back_file.is_empty());
        // The persisted record does not keep the bad file name.
        let record = session
            .store()
            .lookup("MenuScene", WINDOW_LAYER_NAME, 0, "TestWindow")
            .unwrap();
        assert_eq!(record.back_file.as_deref(), Some(""));
        // The rollback consumed the undo entry and the counter.
        assert_eq!(session.change_count(), 0);
        assert_eq!(session.operation_count(), 0);
        assert!(session.status_line().contains("reverted"));
    }

    #[test]
    fn test_property_edit_undo_restores_height_exactly() {
        let mut session = session(false);
        let mut scene = session.enter_scene("MenuScene");
        scene.attach_window(window_at(100.0, 100.0), session.store());
        let mut input = InputState::new();
        let mut platform = NullPlatform::new();
        platform.prompt_reply = Some("3".to_string());

        frame(
            &mut session,
            &mut scene,
            &mut input,
            &mut platform,
            vec![PointerEvent::Move {
                position: Point::new(150.0, 150.0),
            }],
        );
        input.begin_frame();
        input.handle_key_event(KeyEvent::Pressed(EditKey::Digit(7)));
        session.update(&mut scene, &input, &mut platform);

        // Three lines at the standard metrics.
        assert_eq!(scene.windows[0].size.height, 3.0 * 36.0 + 2.0 * 18.0);

        assert!(session.undo(&mut scene));
        assert_eq!(scene.windows[0].size.height, 100.0);
    }

    #[test]
    fn test_scripted_move_targets_the_highlighted_window() {
        let mut session = session(false);
        let mut scene = session.enter_scene("MenuScene");
        scene.attach_window(window_at(100.0, 100.0), session.store());
        let mut input = InputState::new();
        let mut platform = NullPlatform::new();

        // Hovering addresses the window.
        frame(
            &mut session,
            &mut scene,
            &mut input,
            &mut platform,
            vec![PointerEvent::Move {
                position: Point::new(150.0, 150.0),
            }],
        );
        assert!(session.last_addressed().is_some());

        session.move_last_addressed(&mut scene, 12.0, 34.0);
        assert_eq!(scene.windows[0].position(), Point::new(12.0, 34.0));

        // The next frame reports and counts the scripted change.
        frame(&mut session, &mut scene, &mut input, &mut platform, vec![]);
        assert_eq!(session.operation_count(), 1);
        assert!(session.status_line().contains("X:[12]"));
    }

    #[test]
    fn test_scripted_move_without_target_reports() {
        let mut session = session(false);
        let mut scene = session.enter_scene("MenuScene");
        session.move_last_addressed(&mut scene, 12.0, 34.0);
        assert!(session.status_line().contains("invalid"));
        assert_eq!(session.operation_count(), 0);
    }

    #[test]
    fn test_lock_and_unlock_commands_address_roles() {
        let mut session = session(false);
        let mut scene = session.enter_scene("MapScene");
        let mut message = window_at(0.0, 400.0);
        message.role = Some(ContainerRole::Message);
        message.set_locked(true);
        scene.attach_window(message, session.store());

        session.execute(&mut scene, LayoutCommand::UnlockMessage);
        assert!(!scene.windows[0].is_locked());

        // The host repositions the unlocked window, then relocks.
        scene.windows[0].set_position(Point::new(0.0, 0.0));
        session.execute(&mut scene, LayoutCommand::LockMessage);
        assert!(scene.windows[0].is_locked());
        assert_eq!(scene.windows[0].position(), Point::new(0.0, 400.0));

        // No choice window: silently ignored.
        session.execute(&mut scene, LayoutCommand::UnlockChoice);
    }

    #[test]
    fn test_design_mode_off_disables_editing_but_not_restoration() {
        let mut platform = NullPlatform::new();
        let config = DesignConfig {
            design_mode: false,
            ..Default::default()
        };
        let mut session = Session::new(config, MemoryStorage::new(), &platform);
        let mut scene = session.enter_scene("MenuScene");
        scene.attach_window(window_at(100.0, 100.0), session.store());
        let mut input = InputState::new();

        frame(
            &mut session,
            &mut scene,
            &mut input,
            &mut platform,
            vec![PointerEvent::Down {
                position: Point::new(150.0, 150.0),
                button: PointerButton::Primary,
            }],
        );
        assert!(!scene.windows[0].is_holding());
        assert_eq!(session.operation_count(), 0);
    }

    #[test]
    fn test_status_line_concatenates_help_and_changes() {
        let mut session = session(false);
        let mut scene = session.enter_scene("MenuScene");
        scene.attach_window(window_at(100.0, 100.0), session.store());
        let mut input = InputState::new();
        let mut platform = NullPlatform::new();

        assert_eq!(session.status_line(), INFO_HELP);

        drag(
            &mut session,
            &mut scene,
            &mut input,
            &mut platform,
            Point::new(150.0, 150.0),
            Point::new(450.0, 350.0),
        );
        let status = session.status_line();
        assert!(status.starts_with(INFO_HELP));
        assert!(status.contains("X:[400] Y:[300]"));
        assert!(status.contains("position has been changed"));
    }
}
