use std::{path::Path, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    editor::session::Editor,
    foundation::core::{Size, Vec2, pixel_size},
    foundation::error::{LiveError, LiveResult},
    picture::{
        action::DrawAction,
        generator::{BlankPictures, DriftPicture, RepeatPicture, SharedGenerator},
    },
};

/// A recorded editing session: a canvas size and the steps to replay on it.
///
/// ```json
/// {
///   "frame": { "width": 64, "height": 48 },
///   "steps": [
///     { "op": "draw", "action": { "kind": "circle", "center": { "x": 8, "y": 8 },
///       "radius": 4, "color": { "r": 0, "g": 0, "b": 0, "a": 255 }, "width": 2 } },
///     { "op": "generate", "generator": { "kind": "drift", "dx": 2, "dy": 0 }, "count": 20 }
///   ]
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditScript {
    pub frame: FrameSpec,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameSpec {
    pub width: f64,
    pub height: f64,
}

impl FrameSpec {
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Draw { action: DrawAction },
    AddPicture,
    Duplicate,
    Remove,
    Select { index: usize },
    /// Insert `count` generated pictures after the focused one.
    Generate { generator: GeneratorSpec, count: usize },
    ClearAll,
    Undo,
    Redo,
    /// Merge adjacent batches; not recorded in history.
    Compact,
}

/// Generators available to scripts. `repeat` and `drift` take the focused picture as template.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratorSpec {
    Blank,
    Repeat,
    Drift { dx: f64, dy: f64 },
}

impl EditScript {
    pub fn from_json_str(s: &str) -> LiveResult<Self> {
        serde_json::from_str(s).map_err(|e| LiveError::serde(format!("edit script: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> LiveResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> LiveResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| LiveError::serde(e.to_string()))
    }

    /// Replay every step on a fresh [`Editor`].
    pub fn apply(&self) -> LiveResult<Editor> {
        let size = self.frame.size();
        pixel_size(size)?;
        let mut editor = Editor::new(size);
        for (i, step) in self.steps.iter().enumerate() {
            apply_step(&mut editor, step)
                .map_err(|e| LiveError::validation(format!("step {i}: {e}")))?;
        }
        tracing::debug!(
            steps = self.steps.len(),
            pictures = editor.book().count(),
            "edit script applied"
        );
        Ok(editor)
    }
}

fn apply_step(editor: &mut Editor, step: &Step) -> LiveResult<()> {
    match step {
        Step::Draw { action } => editor.draw(action.clone()),
        Step::AddPicture => {
            editor.add_picture();
        }
        Step::Duplicate => {
            editor
                .duplicate_current()
                .ok_or_else(|| LiveError::validation("no picture to duplicate"))?;
        }
        Step::Remove => {
            editor
                .remove_current()
                .ok_or_else(|| LiveError::validation("no picture to remove"))?;
        }
        Step::Select { index } => {
            let count = editor.book().count();
            editor.select(*index).ok_or_else(|| {
                LiveError::validation(format!("select {index} is outside 0..{count}"))
            })?;
        }
        Step::Generate { generator, count } => {
            let generator = build_generator(editor, *generator)?;
            editor.add_generated(generator, *count)?;
        }
        Step::ClearAll => editor.clear_all(),
        Step::Undo => {
            if !editor.undo() {
                tracing::debug!("nothing to undo");
            }
        }
        Step::Redo => {
            if !editor.redo() {
                tracing::debug!("nothing to redo");
            }
        }
        Step::Compact => editor.book_mut().compact(),
    }
    Ok(())
}

fn build_generator(editor: &mut Editor, spec: GeneratorSpec) -> LiveResult<SharedGenerator> {
    if let GeneratorSpec::Blank = spec {
        return Ok(Arc::new(BlankPictures {
            size: editor.frame_size(),
        }));
    }
    let template = editor
        .current_picture()
        .ok_or_else(|| LiveError::validation("generator needs a focused picture"))?
        .snapshot();
    Ok(match spec {
        GeneratorSpec::Drift { dx, dy } => Arc::new(DriftPicture {
            template,
            step: Vec2::new(dx, dy),
        }),
        _ => Arc::new(RepeatPicture { template }),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/editor/script.rs"]
mod tests;
