//! Host services the editor calls out to.
//!
//! The core never talks to the screen, the sound driver or the savedata
//! layer directly; everything goes through this trait so the editor can run
//! headless in tests.

use std::collections::HashSet;

/// Audible feedback cues; the host maps them to actual sound effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Coordinate copied.
    Ok,
    /// Document written to storage.
    Save,
    /// Change undone.
    Cancel,
    /// Window background toggled.
    Miss,
    /// Property edit applied.
    Apply,
}

/// Services the host environment provides to the editor core.
pub trait Platform {
    /// Modal text prompt; `None` when the user cancels.
    fn prompt(&mut self, label: &str, current: &str) -> Option<String>;

    /// Put `text` on the system clipboard.
    fn set_clipboard(&mut self, text: &str);

    /// Whether a picture asset exists and can be loaded.
    fn picture_exists(&self, name: &str) -> bool;

    /// Alpha test for image hit-testing: is the pixel at `(x, y)` of the
    /// named picture opaque?
    fn pixel_opaque(&self, file: &str, x: f64, y: f64) -> bool;

    /// Current value of a game switch.
    fn switch_value(&self, id: u32) -> bool;

    /// Ask the host to rebuild the current scene from scratch.
    fn request_reload(&mut self);

    /// Play an audible feedback cue.
    fn play_cue(&mut self, cue: Cue);

    /// Whether the game is running on a mobile device.
    fn is_mobile_device(&self) -> bool;
}

/// Inert platform for tests and headless runs.
///
/// Prompts answer with the queued reply, every picture exists unless listed
/// as missing, and every pixel is opaque.
#[derive(Debug, Default)]
pub struct NullPlatform {
    /// Reply returned by the next prompt; `None` cancels.
    pub prompt_reply: Option<String>,
    /// Last clipboard contents.
    pub clipboard: Option<String>,
    /// Picture names that should fail the existence probe.
    pub missing_pictures: HashSet<String>,
    /// Switch ids currently on.
    pub switches: HashSet<u32>,
    /// Whether a scene reload has been requested.
    pub reload_requested: bool,
    /// Cues played, in order.
    pub cues: Vec<Cue>,
}

impl NullPlatform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Platform for NullPlatform {
    fn prompt(&mut self, _label: &str, _current: &str) -> Option<String> {
        self.prompt_reply.clone()
    }

    fn set_clipboard(&mut self, text: &str) {
        self.clipboard = Some(text.to_string());
    }

    fn picture_exists(&self, name: &str) -> bool {
        !self.missing_pictures.contains(name)
    }

    fn pixel_opaque(&self, _file: &str, _x: f64, _y: f64) -> bool {
        true
    }

    fn switch_value(&self, id: u32) -> bool {
        self.switches.contains(&id)
    }

    fn request_reload(&mut self) {
        self.reload_requested = true;
    }

    fn play_cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    fn is_mobile_device(&self) -> bool {
        false
    }
}
