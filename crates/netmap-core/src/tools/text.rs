//! Text labels: place with a click, edit or delete by clicking the label.

use super::ToolContext;
use crate::annotation::{Annotation, AnnotationId, AnnotationKind};
use crate::geo::GeoPoint;
use crate::overlay::{LabelKind, Overlay};
use crate::prompt::NotifyLevel;

/// Prompt for a label and place it at `position`.
pub(crate) fn place_label(cx: &mut ToolContext<'_>, position: GeoPoint) -> Option<AnnotationId> {
    let default = cx.config.text.default_label.clone();
    let text = cx
        .prompt
        .ask_text("Enter label text:", &default)
        .filter(|text| !text.is_empty())?;

    let overlay = cx.place(Overlay::Label {
        position,
        kind: LabelKind::Text,
        text: text.clone(),
        draggable: true,
    });
    let id = cx.commit(Annotation::new(
        overlay,
        AnnotationKind::TextLabel {
            position,
            text,
            editable: true,
        },
    ));
    cx.notify(
        "📝 Label added! Click to edit, drag to move.",
        NotifyLevel::Success,
        None,
    );
    Some(id)
}

/// Re-prompt for a label's text. The delete keyword, in any case, removes it.
pub(crate) fn edit_label(cx: &mut ToolContext<'_>, id: AnnotationId) {
    let Some(Annotation {
        overlay,
        kind: AnnotationKind::TextLabel { position, text, .. },
        ..
    }) = cx.annotations.get(id).cloned()
    else {
        return;
    };

    let question = format!(
        "Enter new text or type \"{}\" to remove:",
        cx.config.text.delete_keyword
    );
    let Some(answer) = cx.prompt.ask_text(&question, &text) else {
        return;
    };

    if answer.to_uppercase() == cx.config.text.delete_keyword.to_uppercase() {
        cx.delete_annotation(id);
        cx.notify("Label deleted", NotifyLevel::Info, None);
        return;
    }

    let relabeled = Overlay::Label {
        position,
        kind: LabelKind::Text,
        text: answer.clone(),
        draggable: true,
    };
    if !cx.surface.update_overlay(overlay, relabeled) {
        log::warn!("text label {overlay} missing from the map during edit");
    }
    if let Some(Annotation {
        kind: AnnotationKind::TextLabel { text, .. },
        ..
    }) = cx.annotations.get_mut(id)
    {
        *text = answer;
    }
}

/// Move a label after it was dragged.
pub(crate) fn drag_label(cx: &mut ToolContext<'_>, id: AnnotationId, to: GeoPoint) {
    let Some(annotation) = cx.annotations.get_mut(id) else {
        return;
    };
    let AnnotationKind::TextLabel { position, text, .. } = &mut annotation.kind else {
        return;
    };
    *position = to;

    let moved = Overlay::Label {
        position: to,
        kind: LabelKind::Text,
        text: text.clone(),
        draggable: true,
    };
    let overlay = annotation.overlay;
    if !cx.surface.update_overlay(overlay, moved) {
        log::warn!("text label {overlay} missing from the map during drag");
    }
}
