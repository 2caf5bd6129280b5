// ============================================================================
// EDITOR — headless editing session: events in, canvas mutations out
// ============================================================================

use crate::canvas::{CanvasError, PixelCanvas};
use crate::components::history::CanvasSnapshot;
use crate::components::tools::{Tool, ToolInput, ToolOutput};
use crate::input::{bresenham_line, point_to_cell, StrokeSession};
use crate::ops::transform;
use crate::project::Project;
use crate::render;
use crate::settings::Settings;
use crate::log_info;

/// Input events consumed by the editor. Pointer coordinates are in viewport
/// space; `pointers` is the number of simultaneous contacts.
#[derive(Clone, Copy, Debug)]
pub enum EditorEvent {
    StrokeStart { x: f32, y: f32, pointers: u32 },
    StrokeMove { x: f32, y: f32, pointers: u32 },
    StrokeEnd,
    Resize { width: u32, height: u32 },
    Rotate90,
    FlipHorizontal,
    FlipVertical,
    Undo,
    Redo,
}

/// One editing session over a [`Project`]. Owns the selected tool, brush
/// size, the viewport extent used for pointer mapping, and the in-flight
/// stroke. Single-threaded by design: callers serialize events.
pub struct Editor {
    pub project: Project,
    selected_tool: Tool,
    brush_size: i32,
    viewport: (f32, f32),
    session: StrokeSession,
    settings: Settings,
}

impl Editor {
    pub fn new(settings: Settings) -> Result<Self, CanvasError> {
        let canvas = PixelCanvas::new(settings.default_canvas_width, settings.default_canvas_height)?;
        Ok(Self {
            project: Project::new_untitled(1, canvas, settings.max_undo_steps),
            selected_tool: Tool::Pencil,
            brush_size: 1,
            viewport: (512.0, 512.0),
            session: StrokeSession::default(),
            settings,
        })
    }

    pub fn selected_tool(&self) -> Tool {
        self.selected_tool
    }

    pub fn select_tool(&mut self, tool: Tool) {
        self.selected_tool = tool;
    }

    pub fn brush_size(&self) -> i32 {
        self.brush_size
    }

    pub fn set_brush_size(&mut self, size: i32) {
        self.brush_size = size.clamp(crate::components::tools::MIN_BRUSH_SIZE, crate::components::tools::MAX_BRUSH_SIZE);
    }

    /// Viewport extent the presentation layer maps pointer events through.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = (width, height);
        }
    }

    /// Render the current canvas for display, checkerboard included.
    pub fn render(&self) -> image::RgbaImage {
        render::render_canvas(
            &self.project.canvas,
            self.settings.checker_light,
            self.settings.checker_dark,
        )
    }

    /// Feed one input event through the session. Tool paths never fail;
    /// only `Resize` can reject its arguments.
    pub fn handle_event(&mut self, event: EditorEvent) -> Result<(), CanvasError> {
        match event {
            EditorEvent::StrokeStart { x, y, pointers } => self.stroke_start(x, y, pointers),
            EditorEvent::StrokeMove { x, y, pointers } => self.stroke_move(x, y, pointers),
            EditorEvent::StrokeEnd => {
                self.session.end();
            }
            EditorEvent::Resize { width, height } => {
                let resized = transform::resize(&self.project.canvas, width, height)?;
                self.snapshot();
                self.project.canvas = resized;
                self.project.mark_dirty();
                log_info!("Canvas resized to {}x{}", width, height);
            }
            EditorEvent::Rotate90 => {
                self.snapshot();
                self.project.canvas = transform::rotate90(&self.project.canvas);
                self.project.mark_dirty();
            }
            EditorEvent::FlipHorizontal => {
                self.snapshot();
                transform::flip_horizontal(&mut self.project.canvas);
                self.project.mark_dirty();
            }
            EditorEvent::FlipVertical => {
                self.snapshot();
                transform::flip_vertical(&mut self.project.canvas);
                self.project.mark_dirty();
            }
            EditorEvent::Undo => self.undo(),
            EditorEvent::Redo => self.redo(),
        }
        Ok(())
    }

    fn stroke_start(&mut self, x: f32, y: f32, pointers: u32) {
        if pointers > 1 {
            self.session.abandon();
            return;
        }
        // Pre-stroke state goes onto the undo stack before the first dab, so
        // the whole gesture collapses into one undo step.
        self.snapshot();
        let cell = self.map_point(x, y);
        self.session.begin(cell);
        self.dispatch(cell, None);
    }

    fn stroke_move(&mut self, x: f32, y: f32, pointers: u32) {
        if !self.session.is_active() {
            return;
        }
        if pointers > 1 {
            self.session.abandon();
            return;
        }
        let cell = self.map_point(x, y);
        let Some(last) = self.session.last_cell() else {
            return;
        };
        if cell == last {
            return;
        }

        if self.selected_tool.interpolates_stroke() {
            // Fill the gap between motion samples so fast drags stay solid.
            for point in bresenham_line(last.1, last.0, cell.1, cell.0).into_iter().skip(1) {
                self.dispatch((point.1, point.0), None);
            }
            self.session.advance(cell);
        } else if self.selected_tool == Tool::Move {
            let prev = self.session.advance(cell);
            self.dispatch(cell, prev);
        }
        // Fill/Eyedropper act on the down-point only.
    }

    fn dispatch(&mut self, cell: (i32, i32), prev: Option<(i32, i32)>) {
        let input = ToolInput {
            row: cell.0,
            col: cell.1,
            prev,
            color: self.project.palette.active(),
            size: self.brush_size,
        };
        match self.selected_tool.apply(&mut self.project.canvas, &input) {
            ToolOutput::Mutated => self.project.mark_dirty(),
            ToolOutput::Picked(color) => self.project.palette.set_active(color),
            ToolOutput::NoOp => {}
        }
    }

    /// Map a viewport point to a `(row, col)` cell.
    fn map_point(&self, x: f32, y: f32) -> (i32, i32) {
        let (col, row) = point_to_cell(
            x,
            y,
            self.viewport.0,
            self.viewport.1,
            self.project.canvas.width(),
            self.project.canvas.height(),
        );
        (row as i32, col as i32)
    }

    fn snapshot(&mut self) {
        self.project
            .history
            .save_state(CanvasSnapshot::capture(&self.project.canvas));
    }

    fn undo(&mut self) {
        let current = CanvasSnapshot::capture(&self.project.canvas);
        if let Some(snap) = self.project.history.undo(current) {
            self.project.canvas = snap.restore();
            self.project.mark_dirty();
        }
    }

    fn redo(&mut self) {
        let current = CanvasSnapshot::capture(&self.project.canvas);
        if let Some(snap) = self.project.history.redo(current) {
            self.project.canvas = snap.restore();
            self.project.mark_dirty();
        }
    }
}
