/*!
 * Side panel visibility and the main content margins derived from it.
 */

use serde::{Deserialize, Serialize};

use crate::app_config::DisplayConfig;

/// Visibility of the two side panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelState {
    /// Left panel, listing the vocabulary
    pub vocabulary_visible: bool,
    /// Right panel, showing the translation
    pub translation_visible: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            vocabulary_visible: true,
            translation_visible: true,
        }
    }
}

/// Named form of the four panel combinations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    BothPanels,
    VocabularyOnly,
    TranslationOnly,
    ArticleOnly,
}

/// Horizontal margins of the main content area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub left: u32,
    pub right: u32,
}

impl PanelState {
    pub fn toggle_vocabulary(&mut self) {
        self.vocabulary_visible = !self.vocabulary_visible;
    }

    pub fn toggle_translation(&mut self) {
        self.translation_visible = !self.translation_visible;
    }

    pub fn mode(&self) -> LayoutMode {
        match (self.vocabulary_visible, self.translation_visible) {
            (true, true) => LayoutMode::BothPanels,
            (true, false) => LayoutMode::VocabularyOnly,
            (false, true) => LayoutMode::TranslationOnly,
            (false, false) => LayoutMode::ArticleOnly,
        }
    }

    /// A visible panel reserves `panel_width`, a hidden one `collapsed_margin`
    pub fn margins(&self, display: &DisplayConfig) -> Margins {
        let side = |visible: bool| {
            if visible {
                display.panel_width
            } else {
                display.collapsed_margin
            }
        };
        Margins {
            left: side(self.vocabulary_visible),
            right: side(self.translation_visible),
        }
    }
}
