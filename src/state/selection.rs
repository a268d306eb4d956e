//! Hover state management.

use rhier::PathKey;

/// Node under the pointer, refreshed every frame by the chart panel, and
/// the legend row under the pointer, refreshed by the details panel.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    hovered: Option<PathKey>,
    legend_hovered: Option<PathKey>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.hovered = None;
        self.legend_hovered = None;
    }

    pub fn hovered(&self) -> Option<&PathKey> {
        self.hovered.as_ref()
    }

    pub fn set_hovered(&mut self, key: Option<PathKey>) {
        self.hovered = key;
    }

    pub fn legend_hovered(&self) -> Option<&PathKey> {
        self.legend_hovered.as_ref()
    }

    pub fn set_legend_hovered(&mut self, key: Option<PathKey>) {
        self.legend_hovered = key;
    }

    /// The node to outline: the chart hover wins over a legend row.
    pub fn highlighted(&self) -> Option<&PathKey> {
        self.hovered.as_ref().or(self.legend_hovered.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_hover_highlights_when_chart_idle() {
        let mut selection = SelectionState::new();
        let us = PathKey::from(["US"]);
        let ca = PathKey::from(["CA"]);

        selection.set_legend_hovered(Some(us.clone()));
        assert_eq!(selection.highlighted(), Some(&us));
        assert_eq!(selection.hovered(), None);

        selection.set_hovered(Some(ca.clone()));
        assert_eq!(selection.highlighted(), Some(&ca));

        selection.clear();
        assert_eq!(selection.highlighted(), None);
    }
}
