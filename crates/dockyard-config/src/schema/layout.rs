//! Layout-wide configuration: settings, dimensions and the resolved
//! layout/popout documents.

use serde::{Deserialize, Serialize};

use super::header::HeaderConfig;
use super::item::ResolvedItemConfig;
use super::size::Size;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponsiveMode {
    #[default]
    None,
    Always,
    Onload,
}

/// Behavioural switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Clamp the drag proxy to the container bounds.
    pub constrain_drag_to_container: bool,
    /// Allow tabs to be dragged at all.
    pub reorder_enabled: bool,
    /// Popout button pops out the whole stack instead of the active tab.
    pub popout_whole_stack: bool,
    /// Blocked popout windows raise an error instead of failing silently.
    pub blocked_popouts_throw_error: bool,
    pub close_popouts_on_unload: bool,
    pub responsive_mode: ResponsiveMode,
    /// Maximum negative margin (pixels) between overlapping tabs.
    pub tab_overlap_allowance: f64,
    /// Selecting a tab from the dropdown moves it to the front of the strip.
    pub reorder_on_tab_menu_click: bool,
    /// Pixels reserved between the tab strip and the header controls.
    pub tab_control_offset: f64,
    /// Closing a popout window docks its content back instead of dropping it.
    pub pop_in_on_close: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            constrain_drag_to_container: true,
            reorder_enabled: true,
            popout_whole_stack: false,
            blocked_popouts_throw_error: true,
            close_popouts_on_unload: true,
            responsive_mode: ResponsiveMode::None,
            tab_overlap_allowance: 0.0,
            reorder_on_tab_menu_click: true,
            tab_control_offset: 10.0,
            pop_in_on_close: false,
        }
    }
}

/// Pixel dimensions used by the layout passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dimensions {
    /// Splitter thickness.
    pub border_width: f64,
    /// Splitter hit zone thickness.
    pub border_grab_width: f64,
    pub default_min_item_height: Size,
    pub default_min_item_width: Size,
    pub header_height: f64,
    pub drag_proxy_width: f64,
    pub drag_proxy_height: f64,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            border_width: 5.0,
            border_grab_width: 5.0,
            default_min_item_height: Size::pixels(0.0),
            default_min_item_width: Size::pixels(10.0),
            header_height: 20.0,
            drag_proxy_width: 300.0,
            drag_proxy_height: 200.0,
        }
    }
}

/// A fully resolved layout, as produced by the resolver or by saving a
/// live layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolvedLayoutConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<ResolvedItemConfig>,
    pub open_popouts: Vec<ResolvedPopoutLayoutConfig>,
    pub dimensions: Dimensions,
    pub settings: Settings,
    pub header: HeaderConfig,
    pub resolved: bool,
}

impl Default for ResolvedLayoutConfig {
    fn default() -> Self {
        Self {
            root: None,
            open_popouts: Vec::new(),
            dimensions: Dimensions::default(),
            settings: Settings::default(),
            header: HeaderConfig::default(),
            resolved: true,
        }
    }
}

/// Screen placement of a popout window. Unknown fields are filled in
/// when the window is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopoutWindow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// Self-contained configuration shipped to a popout window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolvedPopoutLayoutConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<ResolvedItemConfig>,
    pub open_popouts: Vec<ResolvedPopoutLayoutConfig>,
    pub dimensions: Dimensions,
    pub settings: Settings,
    pub header: HeaderConfig,
    pub window: PopoutWindow,
    /// Pop-in marker placed on the item the content was removed from.
    pub parent_id: Option<String>,
    pub index_in_parent: Option<usize>,
    pub resolved: bool,
}

impl Default for ResolvedPopoutLayoutConfig {
    fn default() -> Self {
        Self {
            root: None,
            open_popouts: Vec::new(),
            dimensions: Dimensions::default(),
            settings: Settings::default(),
            header: HeaderConfig::default(),
            window: PopoutWindow::default(),
            parent_id: None,
            index_in_parent: None,
            resolved: true,
        }
    }
}

impl ResolvedPopoutLayoutConfig {
    /// The layout a popout window boots with.
    pub fn to_layout_config(&self) -> ResolvedLayoutConfig {
        ResolvedLayoutConfig {
            root: self.root.clone(),
            open_popouts: self.open_popouts.clone(),
            dimensions: self.dimensions.clone(),
            settings: self.settings.clone(),
            header: self.header.clone(),
            resolved: true,
        }
    }
}
