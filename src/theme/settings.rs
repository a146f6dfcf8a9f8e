//! UI-facing card style record
//!
//! This is the shape the new-tab surface persists; field names serialize in
//! camelCase to match the stored settings object.

use crate::color::Color;
use crate::scheme::ColorScheme;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardStyleSettings {
    pub card_background_color: Color,
    pub card_border_color: Color,
    pub title_font_color: Color,
    pub search_box_background_color: Color,
    pub search_box_border_color: Color,
    pub search_box_font_color: Color,
    pub search_button_background_color: Color,
    pub search_button_hover_color: Color,
    pub search_button_font_color: Color,
    pub accent_color: Color,
}

impl CardStyleSettings {
    /// Map scheme roles onto card fields
    pub fn from_scheme(scheme: &ColorScheme) -> Self {
        let c = &scheme.colors;
        Self {
            card_background_color: c.surface,
            card_border_color: c.border,
            title_font_color: c.text,
            search_box_background_color: c.background,
            search_box_border_color: c.border,
            search_box_font_color: c.text,
            search_button_background_color: c.primary,
            search_button_hover_color: c.primary_hover,
            search_button_font_color: c.text_on_primary,
            accent_color: c.accent,
        }
    }
}
