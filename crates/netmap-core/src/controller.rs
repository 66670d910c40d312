//! The per-map tool controller.

use crate::annotation::{AnnotationKind, AnnotationSet};
use crate::config::ToolConfig;
use crate::interaction::{EventBindings, MapEvent};
use crate::overlay::{OverlayId, OverlayRegistry};
use crate::prompt::{Notifier, NotifyLevel, UserPrompt};
use crate::surface::{CursorStyle, MapSurface};
use crate::tools::{self, ParseToolModeError, ToolContext, ToolMode, ToolState};

/// Key that finishes a ruler or area measurement.
pub const FINISH_KEY: &str = "Escape";

/// Owns the drawing tools of one map.
///
/// Holds the active tool with its in-progress buffer, the registry of every
/// overlay the tools placed, and the finalized annotations. All map access
/// goes through the injected [`MapSurface`]; operator dialogs and toasts go
/// through [`UserPrompt`] and [`Notifier`].
#[derive(Debug)]
pub struct MapToolController<S, P, N> {
    surface: S,
    prompt: P,
    notifier: N,
    config: ToolConfig,
    state: ToolState,
    registry: OverlayRegistry,
    annotations: AnnotationSet,
    /// Event kinds currently bound on the surface.
    bound: EventBindings,
}

impl<S, P, N> MapToolController<S, P, N>
where
    S: MapSurface,
    P: UserPrompt,
    N: Notifier,
{
    pub fn new(surface: S, prompt: P, notifier: N) -> Self {
        Self::with_config(surface, prompt, notifier, ToolConfig::default())
    }

    pub fn with_config(surface: S, prompt: P, notifier: N, config: ToolConfig) -> Self {
        Self {
            surface,
            prompt,
            notifier,
            config,
            state: ToolState::Idle,
            registry: OverlayRegistry::new(),
            annotations: AnnotationSet::new(),
            bound: EventBindings::NONE,
        }
    }

    /// Switch to `mode`, discarding whatever the current tool had in progress.
    pub fn activate_tool(&mut self, mode: ToolMode) {
        self.deactivate_all_tools();
        self.state = ToolState::enter(mode);

        if mode != ToolMode::None {
            self.surface.set_cursor(mode.cursor());
            if let Some(hint) = mode.hint() {
                let hint_ms = self.config.durations.tool_hint_ms;
                self.notifier.notify(hint, NotifyLevel::Info, Some(hint_ms));
            }
            log::debug!("activated {mode} tool");
        }
        self.sync_bindings();
    }

    /// Switch to a mode given by name. Unknown names leave no tool active.
    pub fn activate_tool_named(&mut self, name: &str) -> Result<(), ParseToolModeError> {
        match name.parse::<ToolMode>() {
            Ok(mode) => {
                self.activate_tool(mode);
                Ok(())
            }
            Err(err) => {
                log::warn!("{err}");
                self.deactivate_all_tools();
                Err(err)
            }
        }
    }

    /// Leave the active tool, discarding its unfinished work.
    ///
    /// Finalized annotations are kept. Calling this with no active tool does nothing.
    pub fn deactivate_all_tools(&mut self) {
        if self.state.is_idle() {
            return;
        }
        let mode = self.state.mode();
        let (state, mut cx) = self.split();
        state.discard(&mut cx);

        self.state = ToolState::Idle;
        self.surface.set_cursor(CursorStyle::Default);
        self.sync_bindings();
        log::debug!("deactivated {mode} tool");
    }

    /// Remove every overlay the tools placed, after asking the operator.
    ///
    /// Returns whether anything was removed. The active tool stays active
    /// with an empty buffer.
    pub fn clear_all_measurements(&mut self) -> bool {
        if self.registry.is_empty() {
            self.notifier
                .notify("No measurements to clear", NotifyLevel::Info, None);
            return false;
        }
        if !self.prompt.confirm("Clear all measurements and annotations?") {
            return false;
        }

        let removed = self.registry.clear(&mut self.surface);
        self.annotations.clear();
        let (state, mut cx) = self.split();
        state.reset_buffer(&mut cx);
        self.sync_bindings();

        log::info!("cleared {removed} overlays");
        self.notifier
            .notify("All measurements cleared", NotifyLevel::Success, None);
        true
    }

    /// Dispatch one map event to the active tool.
    ///
    /// Events of a kind the active tool has not bound are dropped. Overlay
    /// clicks and drags reach finalized annotations whatever the mode.
    pub fn handle_event(&mut self, event: MapEvent) {
        if let Some(kind) = event.binding() {
            if !self.bound.contains(kind) {
                log::trace!("dropping unbound {kind:?} event");
                return;
            }
        }

        let (state, mut cx) = self.split();
        let finished = match (state, event) {
            (ToolState::Ruler(session), event) if finishes_measurement(&event) => {
                session.finish_ruler(&mut cx);
                true
            }
            (ToolState::Ruler(session), MapEvent::Click(point)) => {
                session.add_ruler_point(&mut cx, point);
                false
            }
            (ToolState::Area(session), event) if finishes_measurement(&event) => {
                session.finish_area(&mut cx);
                true
            }
            (ToolState::Area(session), MapEvent::Click(point)) => {
                session.add_area_point(&mut cx, point);
                false
            }
            (ToolState::Annotation(session), MapEvent::PointerDown(point)) => {
                session.begin(&mut cx, point);
                false
            }
            (ToolState::Annotation(session), MapEvent::PointerMove(point)) => {
                session.extend(&mut cx, point);
                false
            }
            (ToolState::Annotation(session), MapEvent::PointerUp(_)) => {
                session.end(&mut cx);
                false
            }
            (ToolState::Text, MapEvent::Click(point)) => {
                tools::place_label(&mut cx, point);
                false
            }
            (_, MapEvent::OverlayClick(overlay)) => {
                overlay_clicked(&mut cx, overlay);
                false
            }
            (_, MapEvent::OverlayDrag { overlay, position }) => {
                if let Some(id) = cx.annotations.find_by_overlay(overlay) {
                    tools::drag_label(&mut cx, id, position);
                }
                false
            }
            (_, event) => {
                log::trace!("no handler for {event:?}");
                false
            }
        };

        if finished {
            self.state = ToolState::Idle;
            self.surface.set_cursor(CursorStyle::Default);
        }
        self.sync_bindings();
    }

    /// Show a toast through the injected notifier.
    pub fn notify(&mut self, message: &str, level: NotifyLevel, duration_ms: Option<u64>) {
        self.notifier.notify(message, level, duration_ms);
    }

    pub fn active_mode(&self) -> ToolMode {
        self.state.mode()
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    /// Points of the in-progress measurement or stroke.
    pub fn buffer(&self) -> &[crate::geo::GeoPoint] {
        self.state.points()
    }

    pub fn registry(&self) -> &OverlayRegistry {
        &self.registry
    }

    pub fn annotations(&self) -> &AnnotationSet {
        &self.annotations
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn prompt_mut(&mut self) -> &mut P {
        &mut self.prompt
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Overlays the bookkeeping refers to but the map no longer shows.
    ///
    /// Covers registry entries missing from the surface and annotations whose
    /// overlay is not registered. Empty unless there is a bug.
    ///
    /// [`MapSurface`] cannot enumerate its overlays, so objects on the map that
    /// the registry does not track are not reported here. Surfaces that can list
    /// them, like [`MemorySurface`](crate::surface::MemorySurface), are checked
    /// against [`OverlayRegistry::contains`] by the caller.
    pub fn check_consistency(&self) -> Vec<OverlayId> {
        let unregistered = self
            .annotations
            .iter()
            .map(|annotation| annotation.overlay)
            .filter(|&overlay| !self.registry.contains(overlay));
        self.registry
            .iter()
            .filter(|&overlay| !self.surface.has_overlay(overlay))
            .chain(unregistered)
            .collect()
    }

    /// Tear down the active tool and hand back the collaborators.
    pub fn into_parts(mut self) -> (S, P, N) {
        self.deactivate_all_tools();
        (self.surface, self.prompt, self.notifier)
    }

    fn split(&mut self) -> (&mut ToolState, ToolContext<'_>) {
        (
            &mut self.state,
            ToolContext {
                surface: &mut self.surface,
                registry: &mut self.registry,
                annotations: &mut self.annotations,
                prompt: &mut self.prompt,
                notifier: &mut self.notifier,
                config: &self.config,
            },
        )
    }

    /// Bring the surface's event subscriptions in line with the active state.
    fn sync_bindings(&mut self) {
        let desired = self.state.bindings();
        for kind in self.bound.difference(desired).iter() {
            self.surface.unbind(kind);
        }
        for kind in desired.difference(self.bound).iter() {
            self.surface.bind(kind);
        }
        self.bound = desired;
    }
}

fn finishes_measurement(event: &MapEvent) -> bool {
    match event {
        MapEvent::DoubleClick(_) => true,
        MapEvent::KeyDown(key) => key == FINISH_KEY,
        _ => false,
    }
}

fn overlay_clicked(cx: &mut ToolContext<'_>, overlay: OverlayId) {
    let Some(id) = cx.annotations.find_by_overlay(overlay) else {
        log::warn!("click on overlay {overlay} that belongs to no annotation");
        return;
    };
    let kind = cx.annotations.get(id).map(|annotation| &annotation.kind);
    let is_stroke = matches!(kind, Some(AnnotationKind::FreehandStroke { .. }));
    let is_text = matches!(kind, Some(AnnotationKind::TextLabel { .. }));

    if is_stroke {
        tools::confirm_delete(cx, id);
    } else if is_text {
        tools::edit_label(cx, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use crate::interaction::EventKind;
    use crate::prompt::{RecordingNotifier, ScriptedPrompt};
    use crate::surface::MemorySurface;

    type TestController = MapToolController<MemorySurface, ScriptedPrompt, RecordingNotifier>;

    fn controller() -> TestController {
        MapToolController::new(
            MemorySurface::new(),
            ScriptedPrompt::new(),
            RecordingNotifier::new(),
        )
    }

    #[test]
    fn test_activate_sets_cursor_hint_and_bindings() {
        let mut c = controller();
        c.activate_tool(ToolMode::Ruler);

        assert_eq!(c.active_mode(), ToolMode::Ruler);
        assert_eq!(c.surface().cursor(), CursorStyle::Crosshair);
        assert!(c.surface().is_bound(EventKind::Click));
        assert!(c.surface().is_bound(EventKind::DoubleClick));
        assert!(c.surface().is_bound(EventKind::KeyDown));
        let hint = c.notifier().last().unwrap();
        assert_eq!(hint.level, NotifyLevel::Info);
        assert_eq!(hint.duration_ms, Some(5000));
    }

    #[test]
    fn test_switching_tools_rebinds_without_leaks() {
        let mut c = controller();
        c.activate_tool(ToolMode::Ruler);
        c.activate_tool(ToolMode::Text);
        c.activate_tool(ToolMode::Annotation);
        c.activate_tool(ToolMode::Area);

        assert_eq!(c.surface().bound_count(), 3);
        assert!(!c.surface().is_bound(EventKind::PointerDown));
        assert_eq!(c.surface().duplicate_binds(), 0);
        assert_eq!(c.surface().stray_unbinds(), 0);
    }

    #[test]
    fn test_unbound_events_are_dropped() {
        let mut c = controller();
        c.handle_event(MapEvent::Click(GeoPoint::new(1.0, 1.0)));
        assert!(c.registry().is_empty());

        c.activate_tool(ToolMode::Annotation);
        c.handle_event(MapEvent::PointerMove(GeoPoint::new(1.0, 1.0)));
        assert!(c.buffer().is_empty());
    }

    #[test]
    fn test_escape_ignored_outside_measurement() {
        let mut c = controller();
        c.activate_tool(ToolMode::Text);
        c.handle_event(MapEvent::KeyDown(FINISH_KEY.to_string()));
        assert_eq!(c.active_mode(), ToolMode::Text);
    }

    #[test]
    fn test_other_keys_do_not_finish() {
        let mut c = controller();
        c.activate_tool(ToolMode::Ruler);
        c.handle_event(MapEvent::Click(GeoPoint::new(0.0, 0.0)));
        c.handle_event(MapEvent::KeyDown("Enter".to_string()));
        assert_eq!(c.active_mode(), ToolMode::Ruler);
        assert_eq!(c.buffer().len(), 1);
    }

    #[test]
    fn test_unknown_mode_name_deactivates() {
        let mut c = controller();
        c.activate_tool(ToolMode::Ruler);
        let err = c.activate_tool_named("compass").unwrap_err();
        assert_eq!(err.0, "compass");
        assert_eq!(c.active_mode(), ToolMode::None);
        assert_eq!(c.surface().bound_count(), 0);

        c.activate_tool_named("area").unwrap();
        assert_eq!(c.active_mode(), ToolMode::Area);
    }

    #[test]
    fn test_into_parts_tears_down() {
        let mut c = controller();
        c.activate_tool(ToolMode::Area);
        c.handle_event(MapEvent::Click(GeoPoint::new(0.0, 0.0)));
        let (surface, _, _) = c.into_parts();
        assert_eq!(surface.overlay_count(), 0);
        assert_eq!(surface.bound_count(), 0);
        assert_eq!(surface.cursor(), CursorStyle::Default);
    }
}
