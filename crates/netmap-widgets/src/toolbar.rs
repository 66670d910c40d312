//! The map tool strip and the cursor coordinate readout.

use egui::{RichText, Sense, Ui};
use netmap_core::toolbar::{copy_coordinates, CoordinateReadout, ToolbarAction, TOOLBAR_GROUPS};
use netmap_core::{MapSurface, MapToolController, Notifier, ToolMode, UserPrompt};

use crate::buttons::{ToolButton, ToolButtonStyle};
use crate::layout::{toolbar_frame, vertical_separator};
use crate::theme;

/// Draw the tool strip. Returns the action of the button clicked this frame.
pub fn map_toolbar(ui: &mut Ui, active: ToolMode) -> Option<ToolbarAction> {
    let mut action = None;
    toolbar_frame().show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 4.0;
            for (index, group) in TOOLBAR_GROUPS.iter().enumerate() {
                if index > 0 {
                    vertical_separator(ui);
                }
                for button in group.iter() {
                    let style = if button.danger {
                        ToolButtonStyle::danger()
                    } else {
                        ToolButtonStyle::default()
                    };
                    let clicked = ToolButton::new(button.glyph, button.title)
                        .selected(button.is_selected(active))
                        .style(style)
                        .show(ui);
                    if clicked {
                        action = Some(button.action);
                    }
                }
            }
        });
    });
    action
}

/// Draw the coordinate readout. Clicking it copies the coordinates to the
/// system clipboard and confirms through the controller's notifier.
///
/// Returns true when something was copied.
pub fn coordinate_readout<S, P, N>(
    ui: &mut Ui,
    readout: &CoordinateReadout,
    controller: &mut MapToolController<S, P, N>,
) -> bool
where
    S: MapSurface,
    P: UserPrompt,
    N: Notifier,
{
    let color = if readout.position().is_some() {
        theme::TEXT
    } else {
        theme::TEXT_MUTED
    };
    let text = RichText::new(readout.text()).monospace().color(color);
    let response = ui
        .add(egui::Label::new(text).sense(Sense::click()))
        .on_hover_text("Click to copy");

    if !response.clicked() {
        return false;
    }
    let ctx = ui.ctx().clone();
    copy_coordinates(readout, controller, |text| ctx.copy_text(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use netmap_core::{MemorySurface, RecordingNotifier, ScriptedPrompt};

    #[test]
    fn test_toolbar_renders_without_action() {
        let ctx = egui::Context::default();
        let mut action = Some(ToolbarAction::Cancel);
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                action = map_toolbar(ui, ToolMode::Ruler);
            });
        });
        assert_eq!(action, None);
    }

    #[test]
    fn test_readout_without_click_copies_nothing() {
        let ctx = egui::Context::default();
        let mut controller = MapToolController::new(
            MemorySurface::new(),
            ScriptedPrompt::new(),
            RecordingNotifier::new(),
        );
        let readout = CoordinateReadout::default();
        let mut copied = true;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                copied = coordinate_readout(ui, &readout, &mut controller);
            });
        });
        assert!(!copied);
        assert!(controller.notifier().notifications().is_empty());
    }
}
