//! Per-frame drag and edit processing for a single container.
//!
//! The session walks the scene's containers topmost-first and runs one tick
//! per container until one claims the frame. A tick mutates the container
//! directly; everything with wider scope (undo push, persistence, status
//! line, sound cues) is reported back as [`TickEffects`] for the session to
//! apply, with the pre-tick snapshot it captured.

use crate::config::DesignConfig;
use crate::container::{Container, ContainerKind, ContainerRole};
use crate::formula::{self, EvalContext};
use crate::input::{InputState, PointerButton};
use crate::platform::{Cue, Platform};
use crate::snap::{self, SnapModifiers};
use kurbo::{Point, Rect};

/// Read-only surroundings of one container tick.
pub(crate) struct TickContext<'a> {
    pub config: &'a DesignConfig,
    pub ctx: &'a EvalContext,
    /// Rectangles of same-category, interactable, not-held siblings.
    pub candidates: &'a [Rect],
    /// A scripted position change is pending for this container.
    pub position_override: bool,
    /// No sibling has claimed the hover highlight yet this frame.
    pub frame_available: bool,
}

/// What a container tick did.
#[derive(Debug, Default)]
pub(crate) struct TickEffects {
    /// The container consumed the frame's interaction; stop scanning.
    pub claimed: bool,
    /// Push the pre-tick snapshot onto the change stack.
    pub push_undo: bool,
    /// Write the container's record through the layout store.
    pub persist: bool,
    /// New position to report (drag frames, release, scripted moves).
    pub position_info: Option<Point>,
    /// A position change was committed (release or scripted move).
    pub committed_move: bool,
    pub opacity_toggled: bool,
    /// Property label and the value it was set to.
    pub property_changed: Option<(&'static str, String)>,
    /// The background image probe failed; roll the edit back.
    pub background_invalid: bool,
    pub cue: Option<Cue>,
    /// The container took the hover highlight this frame.
    pub highlight_gained: bool,
}

/// Run one editor tick for `container`.
pub(crate) fn tick(
    container: &mut Container,
    input: &InputState,
    platform: &mut dyn Platform,
    tc: &TickContext<'_>,
) -> TickEffects {
    let mut effects = TickEffects::default();
    if container.move_disabled
        || (tc.config.ignore_message_windows
            && container.role.is_some_and(ContainerRole::is_message_family))
    {
        return effects;
    }
    process_position(container, input, platform, tc, &mut effects);
    process_opacity(container, input, platform, tc, &mut effects);
    process_property_input(container, input, platform, tc, &mut effects);
    process_frame_highlight(container, input, platform, tc, &mut effects);
    effects
}

/// Hold, move-with-snapping, release.
fn process_position(
    container: &mut Container,
    input: &InputState,
    platform: &mut dyn Platform,
    tc: &TickContext<'_>,
    effects: &mut TickEffects,
) {
    if tc.position_override {
        effects.position_info = Some(container.position());
        effects.committed_move = true;
        effects.claimed = true;
        return;
    }

    let pointer = input.pointer_position;
    let grabbed = input.is_button_just_pressed(PointerButton::Primary)
        && container.is_interactable()
        && container.hit_test(pointer, platform);
    if grabbed || (container.is_holding() && input.is_button_pressed(PointerButton::Primary)) {
        if !container.is_holding() {
            container.begin_hold(pointer);
            effects.push_undo = true;
        }
        let raw = pointer - container.drag_offset();
        let proposed = Rect::from_origin_size(raw, container.size);
        let snapped = snap::snap_position(
            proposed,
            tc.candidates,
            tc.config.screen,
            SnapModifiers {
                precision: input.modifiers.precision,
                free: input.modifiers.free,
            },
            tc.config.grid_size,
            container.anchored(),
        );
        container.drag_to(snapped);
        effects.position_info = Some(snapped);
        effects.claimed = true;
    } else if container.is_holding() {
        container.end_hold();
        effects.persist = true;
        effects.position_info = Some(container.position());
        effects.committed_move = true;
        effects.claimed = true;
    }
}

/// Secondary click: hide the window or clear its background.
fn process_opacity(
    container: &mut Container,
    input: &InputState,
    platform: &mut dyn Platform,
    tc: &TickContext<'_>,
    effects: &mut TickEffects,
) {
    if !matches!(container.kind, ContainerKind::Window(_)) {
        return;
    }
    if !(input.is_button_just_pressed(PointerButton::Secondary)
        && container.is_interactable()
        && container.hit_test(input.pointer_position, platform))
    {
        return;
    }
    effects.push_undo = true;
    if tc.config.right_click_hide {
        container.visible = !container.visible;
    } else {
        container.opacity = if container.opacity == 255 { 0 } else { 255 };
    }
    effects.persist = true;
    effects.opacity_toggled = true;
    effects.cue = Some(Cue::Miss);
    effects.claimed = true;
}

/// Which property a digit key edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropId {
    Width,
    Height,
    Padding,
    FontSize,
    LineHeight,
    BackOpacity,
    LineCount,
    BackFile,
    FontFace,
}

struct PropSpec {
    id: PropId,
    label: &'static str,
    min: f64,
    max: f64,
    /// Literal string properties accept the entry verbatim, empty included.
    literal: bool,
}

/// Digit keys 1-9 in order.
const PROPS: [PropSpec; 9] = [
    PropSpec { id: PropId::Width, label: "Width", min: 1.0, max: 2000.0, literal: false },
    PropSpec { id: PropId::Height, label: "Height", min: 1.0, max: 2000.0, literal: false },
    PropSpec { id: PropId::Padding, label: "Padding", min: 1.0, max: 100.0, literal: false },
    PropSpec { id: PropId::FontSize, label: "Font size", min: 1.0, max: 100.0, literal: false },
    PropSpec { id: PropId::LineHeight, label: "Line height", min: 1.0, max: 2000.0, literal: false },
    PropSpec { id: PropId::BackOpacity, label: "Background opacity", min: 0.0, max: 255.0, literal: false },
    PropSpec { id: PropId::LineCount, label: "Line count", min: 0.0, max: 999.0, literal: false },
    PropSpec { id: PropId::BackFile, label: "Background image", min: 0.0, max: 0.0, literal: true },
    PropSpec { id: PropId::FontFace, label: "Font name", min: 0.0, max: 0.0, literal: true },
];

/// Number key pressed while hovering a window: prompt and apply.
fn process_property_input(
    container: &mut Container,
    input: &InputState,
    platform: &mut dyn Platform,
    tc: &TickContext<'_>,
    effects: &mut TickEffects,
) {
    if !matches!(container.kind, ContainerKind::Window(_)) {
        return;
    }
    if !(container.is_interactable() && container.hit_test(input.pointer_position, platform)) {
        return;
    }
    let Some(digit) = input.digit_just_pressed() else {
        return;
    };
    if !(1..=9).contains(&digit) {
        return;
    }
    let spec = &PROPS[usize::from(digit) - 1];

    let current = current_value(container, spec.id, tc);
    let Some(entry) = platform.prompt(spec.label, &current) else {
        return;
    };
    if entry.is_empty() && !spec.literal {
        return;
    }

    container.set_highlighted(false);
    effects.push_undo = true;
    let shown = apply_property(container, spec, &entry, platform, tc, effects);
    container.mark_contents_dirty();
    effects.persist = true;
    effects.property_changed = Some((spec.label, shown));
    effects.cue = Some(Cue::Apply);
    effects.claimed = true;
}

/// Prompt default: the stored formula text where one exists, otherwise the
/// current effective value.
fn current_value(container: &Container, id: PropId, tc: &TickContext<'_>) -> String {
    let ContainerKind::Window(w) = &container.kind else {
        return String::new();
    };
    match id {
        PropId::Width => container.size.width.to_string(),
        PropId::Height => container.size.height.to_string(),
        PropId::Padding => w
            .padding
            .clone()
            .unwrap_or_else(|| w.padding(tc.config, tc.ctx).to_string()),
        PropId::FontSize => w
            .font_size
            .clone()
            .unwrap_or_else(|| w.font_size(tc.config, tc.ctx).to_string()),
        PropId::LineHeight => w
            .line_height
            .clone()
            .unwrap_or_else(|| w.line_height(tc.config, tc.ctx).to_string()),
        PropId::BackOpacity => w
            .back_opacity
            .clone()
            .unwrap_or_else(|| w.back_opacity(tc.config, tc.ctx).to_string()),
        PropId::LineCount => w.line_count.to_string(),
        PropId::BackFile => w.back_file.clone(),
        PropId::FontFace => w.font_face.clone(),
    }
}

/// Apply one property entry; returns the value string for the status line.
///
/// Width, height and line count evaluate the entry once on the spot; the
/// other numeric properties keep the entered text and re-evaluate it on
/// every read.
fn apply_property(
    container: &mut Container,
    spec: &PropSpec,
    entry: &str,
    platform: &mut dyn Platform,
    tc: &TickContext<'_>,
    effects: &mut TickEffects,
) -> String {
    match spec.id {
        PropId::Width => {
            let v = formula::eval_clamped(entry, spec.min, spec.max, tc.ctx);
            container.size.width = v;
            v.to_string()
        }
        PropId::Height => {
            let v = formula::eval_clamped(entry, spec.min, spec.max, tc.ctx);
            container.size.height = v;
            v.to_string()
        }
        PropId::Padding => {
            if let ContainerKind::Window(w) = &mut container.kind {
                w.padding = Some(entry.to_string());
            }
            entry.to_string()
        }
        PropId::FontSize => {
            if let ContainerKind::Window(w) = &mut container.kind {
                w.font_size = Some(entry.to_string());
            }
            entry.to_string()
        }
        PropId::LineHeight => {
            if let ContainerKind::Window(w) = &mut container.kind {
                w.line_height = Some(entry.to_string());
            }
            container.apply_fitting_height(tc.config, tc.ctx);
            entry.to_string()
        }
        PropId::BackOpacity => {
            if let ContainerKind::Window(w) = &mut container.kind {
                w.back_opacity = Some(entry.to_string());
            }
            entry.to_string()
        }
        PropId::LineCount => {
            let v = formula::eval_clamped(entry, spec.min, spec.max, tc.ctx) as u32;
            if let ContainerKind::Window(w) = &mut container.kind {
                w.line_count = v;
            }
            container.apply_fitting_height(tc.config, tc.ctx);
            v.to_string()
        }
        PropId::BackFile => {
            if let ContainerKind::Window(w) = &mut container.kind {
                w.back_file = entry.to_string();
            }
            if !entry.is_empty() && !platform.picture_exists(entry) {
                effects.background_invalid = true;
            }
            entry.to_string()
        }
        PropId::FontFace => {
            if let ContainerKind::Window(w) = &mut container.kind {
                w.font_face = entry.to_string();
            }
            entry.to_string()
        }
    }
}

/// Hover highlight; at most one window per frame, topmost wins.
fn process_frame_highlight(
    container: &mut Container,
    input: &InputState,
    platform: &mut dyn Platform,
    tc: &TickContext<'_>,
    effects: &mut TickEffects,
) {
    if !matches!(container.kind, ContainerKind::Window(_)) {
        return;
    }
    if container.is_holding() || !input.pointer_moved() {
        return;
    }
    if tc.frame_available
        && container.is_interactable()
        && container.hit_test(input.pointer_position, platform)
    {
        container.set_highlighted(true);
        effects.highlight_gained = true;
    } else {
        container.set_highlighted(false);
    }
}
