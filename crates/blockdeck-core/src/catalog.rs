//! # Style Catalog
//!
//! The read-only list of style tokens shown in the side panel. Tokens are
//! immutable; a token's drag id is `panel::<style>`.

use crate::identity::DragId;
use crate::ChartStyle;
use serde::{Deserialize, Serialize};

/// A draggable catalog entry representing a chart style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleToken {
    pub style: ChartStyle,
    pub label: String,
    /// Swatch color, `#rrggbb`.
    pub color: String,
}

impl StyleToken {
    #[must_use]
    pub fn new(style: ChartStyle, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            style,
            label: label.into(),
            color: color.into(),
        }
    }

    /// The id this token is grabbed by.
    #[must_use]
    pub fn drag_id(&self) -> DragId {
        DragId::Token(self.style)
    }
}

/// Ordered, read-only list of style tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleCatalog {
    tokens: Vec<StyleToken>,
}

impl StyleCatalog {
    /// Build a catalog from tokens. Later duplicates of a style are dropped.
    #[must_use]
    pub fn new(tokens: impl IntoIterator<Item = StyleToken>) -> Self {
        let mut kept: Vec<StyleToken> = Vec::new();
        for token in tokens {
            if !kept.iter().any(|t| t.style == token.style) {
                kept.push(token);
            }
        }
        Self { tokens: kept }
    }

    #[must_use]
    pub fn get(&self, style: ChartStyle) -> Option<&StyleToken> {
        self.tokens.iter().find(|t| t.style == style)
    }

    #[must_use]
    pub fn contains(&self, style: ChartStyle) -> bool {
        self.get(style).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleToken> {
        self.tokens.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::new([
            StyleToken::new(ChartStyle::Bar, "Bar Chart", "#6366f1"),
            StyleToken::new(ChartStyle::Line, "Line Chart", "#06b6d4"),
            StyleToken::new(ChartStyle::Radar, "Radar Chart", "#8b5cf6"),
            StyleToken::new(ChartStyle::Pie, "Pie Chart", "#f59e0b"),
            StyleToken::new(ChartStyle::RadialBar, "Radial Bar", "#10b981"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_lists_every_style_in_order() {
        let catalog = StyleCatalog::default();
        let styles: Vec<ChartStyle> = catalog.iter().map(|t| t.style).collect();
        assert_eq!(styles, ChartStyle::ALL.to_vec());
        assert_eq!(
            catalog.get(ChartStyle::Pie).map(|t| t.label.as_str()),
            Some("Pie Chart")
        );
    }

    #[test]
    fn token_drag_id_uses_panel_namespace() {
        let token = StyleToken::new(ChartStyle::Line, "Line Chart", "#06b6d4");
        assert_eq!(token.drag_id().to_string(), "panel::line");
    }

    #[test]
    fn restricted_catalog() {
        let catalog = StyleCatalog::new([
            StyleToken::new(ChartStyle::Bar, "Bars", "#000000"),
            StyleToken::new(ChartStyle::Bar, "Again", "#ffffff"),
        ]);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains(ChartStyle::Bar));
        assert!(!catalog.contains(ChartStyle::Radar));
    }
}
