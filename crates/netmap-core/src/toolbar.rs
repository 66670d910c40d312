//! Toolbar layout and the cursor coordinate readout.
//!
//! Presentation only: buttons map to controller calls and the readout
//! formats whatever position it was last given.

use crate::config::ReadoutConfig;
use crate::controller::MapToolController;
use crate::geo::GeoPoint;
use crate::prompt::{Notifier, NotifyLevel, UserPrompt};
use crate::surface::MapSurface;
use crate::tools::ToolMode;
use serde::{Deserialize, Serialize};

/// What a toolbar button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolbarAction {
    Activate(ToolMode),
    ClearAll,
    Cancel,
}

impl ToolbarAction {
    pub fn apply<S, P, N>(self, controller: &mut MapToolController<S, P, N>)
    where
        S: MapSurface,
        P: UserPrompt,
        N: Notifier,
    {
        match self {
            ToolbarAction::Activate(mode) => controller.activate_tool(mode),
            ToolbarAction::ClearAll => {
                controller.clear_all_measurements();
            }
            ToolbarAction::Cancel => controller.deactivate_all_tools(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarButton {
    pub action: ToolbarAction,
    pub glyph: &'static str,
    /// Tooltip.
    pub title: &'static str,
    /// Destructive action, drawn in a warning color.
    pub danger: bool,
}

impl ToolbarButton {
    const fn new(action: ToolbarAction, glyph: &'static str, title: &'static str) -> Self {
        Self {
            action,
            glyph,
            title,
            danger: false,
        }
    }

    /// Whether the button shows the selected state for the active mode.
    pub fn is_selected(&self, active: ToolMode) -> bool {
        match self.action {
            ToolbarAction::Activate(mode) => mode == active && mode != ToolMode::None,
            _ => false,
        }
    }
}

/// Toolbar buttons, grouped as they are separated on screen.
pub const TOOLBAR_GROUPS: [&[ToolbarButton]; 3] = [
    &[
        ToolbarButton::new(
            ToolbarAction::Activate(ToolMode::Ruler),
            "📏",
            "Measure Distance (Ruler)",
        ),
        ToolbarButton::new(
            ToolbarAction::Activate(ToolMode::Area),
            "📐",
            "Measure Area",
        ),
    ],
    &[
        ToolbarButton::new(
            ToolbarAction::Activate(ToolMode::Annotation),
            "✏️",
            "Draw Annotation",
        ),
        ToolbarButton::new(ToolbarAction::Activate(ToolMode::Text), "📝", "Add Text Label"),
    ],
    &[
        ToolbarButton {
            danger: true,
            ..ToolbarButton::new(ToolbarAction::ClearAll, "🗑", "Clear All Measurements")
        },
        ToolbarButton::new(ToolbarAction::Cancel, "✖", "Cancel/Deselect Tool"),
    ],
];

/// Live readout of the cursor position.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateReadout {
    position: Option<GeoPoint>,
    precision: usize,
    placeholder: String,
}

impl Default for CoordinateReadout {
    fn default() -> Self {
        Self::new(&ReadoutConfig::default())
    }
}

impl CoordinateReadout {
    pub fn new(config: &ReadoutConfig) -> Self {
        Self {
            position: None,
            precision: config.precision,
            placeholder: config.placeholder.clone(),
        }
    }

    pub fn update(&mut self, position: GeoPoint) {
        self.position = Some(position);
    }

    pub fn position(&self) -> Option<GeoPoint> {
        self.position
    }

    /// What the readout shows.
    pub fn text(&self) -> String {
        match self.position {
            Some(position) => position.format(self.precision),
            None => self.placeholder.clone(),
        }
    }

    /// The displayed coordinate pair, or `None` before the cursor has been over the map.
    pub fn copy_text(&self) -> Option<String> {
        self.position.map(|position| position.format(self.precision))
    }
}

/// Copy the displayed coordinates through `clipboard` and confirm with a toast.
pub fn copy_coordinates<S, P, N>(
    readout: &CoordinateReadout,
    controller: &mut MapToolController<S, P, N>,
    clipboard: impl FnOnce(&str),
) -> bool
where
    S: MapSurface,
    P: UserPrompt,
    N: Notifier,
{
    let Some(text) = readout.copy_text() else {
        return false;
    };
    clipboard(&text);
    let copy_ms = controller.config().durations.copy_ms;
    controller.notify("📋 Coordinates copied!", NotifyLevel::Success, Some(copy_ms));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{RecordingNotifier, ScriptedPrompt};
    use crate::surface::MemorySurface;

    #[test]
    fn test_groups_cover_every_mode_once() {
        let modes: Vec<ToolMode> = TOOLBAR_GROUPS
            .iter()
            .flat_map(|group| group.iter())
            .filter_map(|button| match button.action {
                ToolbarAction::Activate(mode) => Some(mode),
                _ => None,
            })
            .collect();
        assert_eq!(
            modes,
            vec![ToolMode::Ruler, ToolMode::Area, ToolMode::Annotation, ToolMode::Text]
        );
        let dangerous: Vec<ToolbarAction> = TOOLBAR_GROUPS
            .iter()
            .flat_map(|group| group.iter())
            .filter(|button| button.danger)
            .map(|button| button.action)
            .collect();
        assert_eq!(dangerous, vec![ToolbarAction::ClearAll]);
    }

    #[test]
    fn test_button_titles() {
        let titles: Vec<&str> = TOOLBAR_GROUPS
            .iter()
            .flat_map(|group| group.iter())
            .map(|button| button.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "Measure Distance (Ruler)",
                "Measure Area",
                "Draw Annotation",
                "Add Text Label",
                "Clear All Measurements",
                "Cancel/Deselect Tool",
            ]
        );
    }

    #[test]
    fn test_selected_state() {
        let ruler = &TOOLBAR_GROUPS[0][0];
        assert!(ruler.is_selected(ToolMode::Ruler));
        assert!(!ruler.is_selected(ToolMode::Area));
        assert!(!TOOLBAR_GROUPS[2][1].is_selected(ToolMode::None));
    }

    #[test]
    fn test_readout_text() {
        let mut readout = CoordinateReadout::default();
        assert_eq!(readout.text(), "Move cursor over map");
        assert_eq!(readout.copy_text(), None);

        readout.update(GeoPoint::new(-6.2, 106.816666));
        assert_eq!(readout.text(), "-6.200000, 106.816666");
    }

    #[test]
    fn test_copy_coordinates() {
        let mut controller = MapToolController::new(
            MemorySurface::new(),
            ScriptedPrompt::new(),
            RecordingNotifier::new(),
        );
        let mut readout = CoordinateReadout::default();
        let mut copied = None;

        assert!(!copy_coordinates(&readout, &mut controller, |text| {
            copied = Some(text.to_string())
        }));
        assert!(copied.is_none());

        readout.update(GeoPoint::new(1.5, 2.25));
        assert!(copy_coordinates(&readout, &mut controller, |text| {
            copied = Some(text.to_string())
        }));
        assert_eq!(copied.as_deref(), Some("1.500000, 2.250000"));
        let toast = controller.notifier().last().unwrap();
        assert_eq!(toast.message, "📋 Coordinates copied!");
        assert_eq!(toast.duration_ms, Some(2000));
    }

    #[test]
    fn test_actions_drive_controller() {
        let mut controller = MapToolController::new(
            MemorySurface::new(),
            ScriptedPrompt::new(),
            RecordingNotifier::new(),
        );
        ToolbarAction::Activate(ToolMode::Text).apply(&mut controller);
        assert_eq!(controller.active_mode(), ToolMode::Text);
        ToolbarAction::Cancel.apply(&mut controller);
        assert_eq!(controller.active_mode(), ToolMode::None);
        ToolbarAction::ClearAll.apply(&mut controller);
        assert_eq!(controller.notifier().count("No measurements to clear"), 1);
    }
}
