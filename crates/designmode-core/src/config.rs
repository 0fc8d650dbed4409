//! Editor configuration.
//!
//! One plain struct the host fills at startup and hands to the session.

use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which persisted layout document a session reads and writes.
///
/// Desktop and mobile layouts are kept in separate documents so the same
/// project can ship both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceClass {
    #[default]
    Desktop,
    Mobile,
}

impl DeviceClass {
    /// File name of the layout document for this device class.
    pub fn document_name(self) -> &'static str {
        match self {
            DeviceClass::Desktop => "ContainerProperties.json",
            DeviceClass::Mobile => "ContainerPropertiesMobile.json",
        }
    }
}

/// A picture declared for a scene in the static configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PictureDecl {
    /// Picture asset name, empty entries are skipped.
    pub file: String,
    /// Visibility switch id, 0 = always visible.
    pub switch_id: u32,
}

/// An extra window declared for a scene in the static configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowDecl {
    /// Text lines the host renders into the window; the line count drives the
    /// initial window height. Empty declarations are skipped.
    pub lines: Vec<String>,
    /// Visibility switch id, 0 = always visible.
    pub switch_id: u32,
}

/// Extra containers attached to one scene when it is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneExtras {
    pub pictures: Vec<PictureDecl>,
    pub windows: Vec<WindowDecl>,
}

/// Editor-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignConfig {
    /// Master switch; when off the editor only restores persisted records and
    /// drives extras visibility.
    pub design_mode: bool,
    /// Serialize the whole document on every committed change instead of only
    /// on the explicit save command.
    pub auto_save: bool,
    /// Grid cell size for the precision modifier, 0 disables grid snapping.
    pub grid_size: f64,
    /// Logical screen box the editor snaps against.
    pub screen: Size,
    /// Secondary click hides the whole window instead of clearing its
    /// background opacity.
    pub right_click_hide: bool,
    /// Leave message, choice and number-input windows alone entirely.
    pub ignore_message_windows: bool,
    /// Maintain a separate layout document for mobile devices.
    pub mobile_layout: bool,
    /// Pretend to be a mobile device, for authoring the mobile layout on a
    /// desktop machine.
    pub fake_mobile: bool,
    /// Default window padding override, 0 = use the built-in standard.
    pub default_padding: f64,
    /// Default font size override, 0 = use the built-in standard.
    pub default_font_size: f64,
    /// Default line height override, 0 = use the built-in standard.
    pub default_line_height: f64,
    /// Default background opacity override, 0 = use the built-in standard.
    pub default_back_opacity: f64,
    /// Extra pictures and windows per scene name.
    pub scenes: HashMap<String, SceneExtras>,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            design_mode: true,
            auto_save: false,
            grid_size: 48.0,
            screen: Size::new(816.0, 624.0),
            right_click_hide: false,
            ignore_message_windows: false,
            mobile_layout: false,
            fake_mobile: false,
            default_padding: 0.0,
            default_font_size: 0.0,
            default_line_height: 0.0,
            default_back_opacity: 0.0,
            scenes: HashMap::new(),
        }
    }
}

impl DesignConfig {
    /// Resolve the layout document this session should use.
    pub fn device_class(&self, platform_is_mobile: bool) -> DeviceClass {
        if self.mobile_layout && (self.fake_mobile || platform_is_mobile) {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}
