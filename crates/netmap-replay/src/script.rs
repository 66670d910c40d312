//! Replay scripts: raw input steps and recorded prompt answers.

use kurbo::Point;
use netmap_core::{
    Annotation, ConfigError, GeoPoint, InteractionSurface, KeyEvent, MapToolController,
    MemorySurface, MouseButton, Notification, OverlayEvent, OverlayId, ParseToolModeError,
    PointerEvent, RecordingNotifier, ScriptedPrompt, ToolConfig, ToolMode,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("usage: {0}")]
    Usage(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Mode(#[from] ParseToolModeError),
    #[error("step {step}: no annotation at index {index}")]
    MissingAnnotation { step: usize, index: usize },
}

pub type ReplayResult<T> = Result<T, ReplayError>;

/// Time between steps on the virtual clock.
const STEP_INTERVAL: Duration = Duration::from_secs(1);
/// Time between the two clicks of a double-click.
const DOUBLE_CLICK_GAP: Duration = Duration::from_millis(100);

/// Recorded answers to operator prompts, consumed in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Answers {
    /// Text prompt answers; `null` cancels the prompt.
    pub texts: Vec<Option<String>>,
    pub confirms: Vec<bool>,
}

/// One scripted input. Positions are screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Activate a tool by name.
    Activate(String),
    Cancel,
    Clear,
    Click { x: f64, y: f64 },
    DoubleClick { x: f64, y: f64 },
    /// Press at the first point, move through the rest, release at the last.
    Drag { path: Vec<[f64; 2]> },
    Move { x: f64, y: f64 },
    Key(String),
    /// Click the overlay of the n-th annotation.
    ClickAnnotation(usize),
    /// Drop the overlay of the n-th annotation at a new position.
    DragAnnotation { index: usize, x: f64, y: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    /// Inline tool configuration. A `--config` file takes precedence.
    #[serde(default)]
    pub config: Option<ToolConfig>,
    /// Geographic position of the top-left pixel.
    #[serde(default)]
    pub origin: GeoPoint,
    #[serde(default = "default_degrees_per_pixel")]
    pub degrees_per_pixel: f64,
    /// Give the map a geodesic area routine. Areas are planar without one.
    #[serde(default)]
    pub geodesic_area: bool,
    #[serde(default)]
    pub answers: Answers,
    pub steps: Vec<Step>,
}

fn default_degrees_per_pixel() -> f64 {
    MemorySurface::DEFAULT_DEGREES_PER_PIXEL
}

impl Script {
    pub fn from_json(json: &str) -> ReplayResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ReplayResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// What a replay left behind.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub mode: ToolMode,
    pub annotations: Vec<&'a Annotation>,
    pub overlays: usize,
    pub notifications: &'a [Notification],
    pub readout: String,
}

type Controller = MapToolController<MemorySurface, ScriptedPrompt, RecordingNotifier>;

/// Drives a controller on an in-memory map from a script.
pub struct Replay {
    controller: Controller,
    interaction: InteractionSurface,
    clock: Instant,
}

impl Replay {
    pub fn new(script: &Script, config: ToolConfig) -> Self {
        let mut surface = MemorySurface::with_projection(script.origin, script.degrees_per_pixel);
        if script.geodesic_area {
            surface = surface.with_geodesic_area();
        }
        let mut prompt = ScriptedPrompt::new();
        for answer in &script.answers.texts {
            prompt.answer_text(answer.as_deref());
        }
        for &answer in &script.answers.confirms {
            prompt.answer_confirm(answer);
        }

        Self {
            interaction: InteractionSurface::new(&config),
            controller: MapToolController::with_config(
                surface,
                prompt,
                RecordingNotifier::new(),
                config,
            ),
            clock: Instant::now(),
        }
    }

    pub fn run(&mut self, steps: &[Step]) -> ReplayResult<()> {
        for (index, step) in steps.iter().enumerate() {
            log::debug!("step {index}: {step:?}");
            self.clock += STEP_INTERVAL;
            self.step(index, step)?;
        }
        let unused = self.controller.prompt_mut().pending();
        if unused > 0 {
            log::warn!("{unused} recorded answers were never asked for");
        }
        if !self.controller.check_consistency().is_empty() {
            log::warn!("overlay bookkeeping diverged from the map");
        }
        Ok(())
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn report(&self) -> Report<'_> {
        Report {
            mode: self.controller.active_mode(),
            annotations: self.controller.annotations().iter().collect(),
            overlays: self.controller.surface().overlay_count(),
            notifications: self.controller.notifier().notifications(),
            readout: self.interaction.readout.text(),
        }
    }

    fn step(&mut self, index: usize, step: &Step) -> ReplayResult<()> {
        match step {
            Step::Activate(name) => self.controller.activate_tool_named(name)?,
            Step::Cancel => self.controller.deactivate_all_tools(),
            Step::Clear => {
                self.controller.clear_all_measurements();
            }
            Step::Click { x, y } => self.click(Point::new(*x, *y)),
            Step::DoubleClick { x, y } => {
                let at = Point::new(*x, *y);
                self.click(at);
                self.clock += DOUBLE_CLICK_GAP;
                self.click(at);
            }
            Step::Drag { path } => self.drag(path),
            Step::Move { x, y } => self.pointer(PointerEvent::Move {
                position: Point::new(*x, *y),
            }),
            Step::Key(key) => self
                .interaction
                .key(&mut self.controller, KeyEvent::Pressed(key.clone())),
            Step::ClickAnnotation(n) => {
                let overlay = self.annotation_overlay(index, *n)?;
                self.interaction
                    .overlay(&mut self.controller, OverlayEvent::Clicked(overlay));
            }
            Step::DragAnnotation { index: n, x, y } => {
                let overlay = self.annotation_overlay(index, *n)?;
                self.interaction.overlay(
                    &mut self.controller,
                    OverlayEvent::Dragged {
                        overlay,
                        position: Point::new(*x, *y),
                    },
                );
            }
        }
        Ok(())
    }

    fn pointer(&mut self, event: PointerEvent) {
        self.interaction.pointer_at(&mut self.controller, event, self.clock);
    }

    fn click(&mut self, at: Point) {
        self.pointer(PointerEvent::Down {
            position: at,
            button: MouseButton::Left,
        });
        self.pointer(PointerEvent::Up {
            position: at,
            button: MouseButton::Left,
        });
    }

    fn drag(&mut self, path: &[[f64; 2]]) {
        let mut points = path.iter().map(|&[x, y]| Point::new(x, y));
        let Some(first) = points.next() else {
            return;
        };
        self.pointer(PointerEvent::Down {
            position: first,
            button: MouseButton::Left,
        });
        let mut last = first;
        for position in points {
            self.pointer(PointerEvent::Move { position });
            last = position;
        }
        self.pointer(PointerEvent::Up {
            position: last,
            button: MouseButton::Left,
        });
    }

    fn annotation_overlay(&self, step: usize, index: usize) -> ReplayResult<OverlayId> {
        self.controller
            .annotations()
            .iter()
            .nth(index)
            .map(|annotation| annotation.overlay)
            .ok_or(ReplayError::MissingAnnotation { step, index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netmap_core::AnnotationKind;
    use std::io::Write;

    const SURVEY: &str = r#"{
        "answers": { "texts": ["ODP-12", "delete"], "confirms": [true] },
        "steps": [
            { "activate": "ruler" },
            { "click": { "x": 0, "y": 0 } },
            { "double_click": { "x": 1000, "y": 0 } },
            { "activate": "text" },
            { "click": { "x": 200, "y": 200 } },
            { "activate": "annotation" },
            { "drag": { "path": [[0, 500], [50, 520], [100, 560]] } },
            { "move": { "x": 100, "y": 200 } }
        ]
    }"#;

    fn replay(json: &str) -> Replay {
        let script = Script::from_json(json).unwrap();
        let mut replay = Replay::new(&script, script.config.clone().unwrap_or_default());
        replay.run(&script.steps).unwrap();
        replay
    }

    #[test]
    fn test_step_json_shape() {
        let steps: Vec<Step> =
            serde_json::from_str(r#"["cancel", { "key": "Escape" }, { "click_annotation": 2 }]"#)
                .unwrap();
        assert_eq!(
            steps,
            vec![Step::Cancel, Step::Key("Escape".to_string()), Step::ClickAnnotation(2)]
        );
    }

    #[test]
    fn test_survey_replay() {
        let replay = replay(SURVEY);
        let report = replay.report();

        let kinds: Vec<&AnnotationKind> = report.annotations.iter().map(|a| &a.kind).collect();
        assert_eq!(kinds.len(), 3);
        assert!(matches!(kinds[0], AnnotationKind::DistanceLabel { .. }));
        assert!(matches!(kinds[1], AnnotationKind::TextLabel { text, .. } if text == "ODP-12"));
        assert!(matches!(kinds[2], AnnotationKind::FreehandStroke { path } if path.len() == 3));
        assert_eq!(report.mode, ToolMode::Annotation);
        assert_eq!(report.readout, "-0.002000, 0.001000");
        assert!(replay.controller().check_consistency().is_empty());
    }

    #[test]
    fn test_annotation_steps() {
        let json = SURVEY.replace(
            r#"{ "move": { "x": 100, "y": 200 } }"#,
            r#"{ "drag_annotation": { "index": 1, "x": 300, "y": 300 } },
               { "click_annotation": 1 },
               { "click_annotation": 1 }"#,
        );
        let replay = replay(&json);
        let report = replay.report();

        // the label was deleted, then the stroke took its index and was confirmed away
        assert_eq!(report.annotations.len(), 1);
        assert_eq!(replay.controller().notifier().count("Label deleted"), 1);
    }

    #[test]
    fn test_missing_annotation() {
        let script = Script::from_json(r#"{ "steps": [{ "click_annotation": 0 }] }"#).unwrap();
        let mut replay = Replay::new(&script, ToolConfig::default());
        let result = replay.run(&script.steps);
        assert!(matches!(
            result,
            Err(ReplayError::MissingAnnotation { step: 0, index: 0 })
        ));
    }

    #[test]
    fn test_unknown_tool() {
        let script = Script::from_json(r#"{ "steps": [{ "activate": "compass" }] }"#).unwrap();
        let mut replay = Replay::new(&script, ToolConfig::default());
        assert!(matches!(replay.run(&script.steps), Err(ReplayError::Mode(_))));
    }

    #[test]
    fn test_geodesic_area_switch() {
        let steps = r#"[
            { "activate": "area" },
            { "click": { "x": 0, "y": 0 } },
            { "click": { "x": 1000, "y": 0 } },
            { "click": { "x": 1000, "y": 1000 } },
            { "key": "Escape" }
        ]"#;
        let area = |geodesic: bool| {
            let json = format!(
                r#"{{ "origin": {{ "lat": 61.0, "lng": 0.0 }}, "degrees_per_pixel": 0.001,
                     "geodesic_area": {geodesic}, "steps": {steps} }}"#
            );
            let replay = replay(&json);
            let kind = replay.report().annotations.first().map(|a| a.kind.clone());
            match kind {
                Some(AnnotationKind::AreaLabel {
                    total_area_sq_m, ..
                }) => total_area_sq_m,
                other => panic!("expected an area label, got {other:?}"),
            }
        };
        let (planar, geodesic) = (area(false), area(true));
        assert!((planar - geodesic).abs() > 1e3, "{planar} vs {geodesic}");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "degrees_per_pixel": 0.001, "steps": ["clear"] }}"#).unwrap();
        let script = Script::load(file.path()).unwrap();
        assert!((script.degrees_per_pixel - 0.001).abs() < f64::EPSILON);
        assert_eq!(script.steps, vec![Step::Clear]);
    }
}
