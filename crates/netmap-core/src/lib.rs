//! NetMap Core Library
//!
//! Measurement and annotation tools for the network asset map: geometry,
//! overlay bookkeeping, the tool state machine and the input plumbing that
//! drives it. Rendering and dialogs are injected through traits.

pub mod annotation;
pub mod config;
pub mod controller;
pub mod geo;
pub mod input;
pub mod interaction;
pub mod overlay;
pub mod prompt;
pub mod surface;
pub mod toolbar;
pub mod tools;

pub use annotation::{Annotation, AnnotationId, AnnotationKind, AnnotationSet};
pub use config::{ConfigError, ConfigResult, ToolConfig};
pub use controller::MapToolController;
pub use geo::{GeoPoint, GeodesicArea, SphericalExcess};
pub use input::{InputState, KeyEvent, MouseButton, OverlayEvent, PointerEvent};
pub use interaction::{EventBindings, EventKind, InteractionSurface, MapEvent};
pub use overlay::{LabelKind, Overlay, OverlayId, OverlayRegistry, OverlayStyle};
pub use prompt::{
    Notification, Notifier, NotifyLevel, RecordingNotifier, ScriptedPrompt, UserPrompt,
};
pub use surface::{CursorStyle, MapSurface, MemorySurface};
pub use toolbar::{CoordinateReadout, TOOLBAR_GROUPS, ToolbarAction, ToolbarButton};
pub use tools::{ParseToolModeError, ToolMode, ToolState};
