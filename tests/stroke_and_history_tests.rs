// Editor-level gesture tests: event stream in, canvas + history out.

use pixelpad::canvas::Color;
use pixelpad::components::tools::Tool;
use pixelpad::editor::{Editor, EditorEvent};
use pixelpad::settings::Settings;

/// 16x16 canvas mapped through a 160x160 viewport: one cell per 10px.
fn editor() -> Editor {
    let mut e = Editor::new(Settings::default()).unwrap();
    e.set_viewport(160.0, 160.0);
    e
}

fn active(e: &Editor) -> Color {
    e.project.palette.active()
}

#[test]
fn pencil_stroke_paints_mapped_cell() {
    let mut e = editor();
    e.handle_event(EditorEvent::StrokeStart { x: 55.0, y: 35.0, pointers: 1 }).unwrap();
    e.handle_event(EditorEvent::StrokeEnd).unwrap();
    assert_eq!(e.project.canvas.get_pixel(3, 5).unwrap(), active(&e));
}

#[test]
fn fast_drag_leaves_connected_stroke() {
    let mut e = editor();
    // Down in the top-left cell, one coarse motion sample to (5, 3).
    e.handle_event(EditorEvent::StrokeStart { x: 5.0, y: 5.0, pointers: 1 }).unwrap();
    e.handle_event(EditorEvent::StrokeMove { x: 55.0, y: 35.0, pointers: 1 }).unwrap();
    e.handle_event(EditorEvent::StrokeEnd).unwrap();

    let color = active(&e);
    let painted: Vec<(u32, u32)> = (0..16u32)
        .flat_map(|r| (0..16u32).map(move |c| (r, c)))
        .filter(|(r, c)| e.project.canvas.get_pixel(*r, *c).unwrap() == color)
        .collect();

    // Endpoints present.
    assert!(painted.contains(&(0, 0)));
    assert!(painted.contains(&(3, 5)));
    // Interpolated: strictly more cells than the two samples, and every
    // painted cell has a painted 8-neighbor (no isolated skips).
    assert!(painted.len() > 2);
    for (r, c) in &painted {
        if painted.len() == 1 {
            break;
        }
        let has_neighbor = painted.iter().any(|(r2, c2)| {
            (r2 != r || c2 != c)
                && r2.abs_diff(*r) <= 1
                && c2.abs_diff(*c) <= 1
        });
        assert!(has_neighbor, "cell ({}, {}) is isolated", r, c);
    }
}

#[test]
fn undo_restores_exact_pre_stroke_state_and_redo_reverts() {
    let mut e = editor();
    let before = e.project.canvas.clone();

    e.handle_event(EditorEvent::StrokeStart { x: 15.0, y: 15.0, pointers: 1 }).unwrap();
    e.handle_event(EditorEvent::StrokeMove { x: 95.0, y: 75.0, pointers: 1 }).unwrap();
    e.handle_event(EditorEvent::StrokeEnd).unwrap();
    let after = e.project.canvas.clone();
    assert_ne!(before, after);

    e.handle_event(EditorEvent::Undo).unwrap();
    assert_eq!(e.project.canvas, before);

    e.handle_event(EditorEvent::Redo).unwrap();
    assert_eq!(e.project.canvas, after);
}

#[test]
fn whole_drag_is_one_undo_step() {
    let mut e = editor();
    let before = e.project.canvas.clone();
    e.handle_event(EditorEvent::StrokeStart { x: 5.0, y: 5.0, pointers: 1 }).unwrap();
    for i in 1..10 {
        e.handle_event(EditorEvent::StrokeMove {
            x: 5.0 + i as f32 * 12.0,
            y: 5.0,
            pointers: 1,
        })
        .unwrap();
    }
    e.handle_event(EditorEvent::StrokeEnd).unwrap();

    e.handle_event(EditorEvent::Undo).unwrap();
    assert_eq!(e.project.canvas, before);
}

#[test]
fn undo_with_empty_history_is_a_noop() {
    let mut e = editor();
    let before = e.project.canvas.clone();
    e.handle_event(EditorEvent::Undo).unwrap();
    e.handle_event(EditorEvent::Redo).unwrap();
    assert_eq!(e.project.canvas, before);
}

#[test]
fn second_pointer_abandons_the_gesture() {
    let mut e = editor();
    e.handle_event(EditorEvent::StrokeStart { x: 5.0, y: 5.0, pointers: 1 }).unwrap();
    e.handle_event(EditorEvent::StrokeMove { x: 50.0, y: 5.0, pointers: 2 }).unwrap();
    let at_abandon = e.project.canvas.clone();
    // Further motion must not draw.
    e.handle_event(EditorEvent::StrokeMove { x: 150.0, y: 150.0, pointers: 1 }).unwrap();
    assert_eq!(e.project.canvas, at_abandon);
}

#[test]
fn two_finger_down_never_draws() {
    let mut e = editor();
    let before = e.project.canvas.clone();
    e.handle_event(EditorEvent::StrokeStart { x: 5.0, y: 5.0, pointers: 2 }).unwrap();
    e.handle_event(EditorEvent::StrokeMove { x: 50.0, y: 50.0, pointers: 1 }).unwrap();
    assert_eq!(e.project.canvas, before);
    // And no snapshot was taken for the dead gesture.
    assert!(!e.project.history.can_undo());
}

#[test]
fn eraser_stroke_clears_painted_cells() {
    let mut e = editor();
    e.project.canvas.fill(Color::rgb(10, 20, 30));
    e.select_tool(Tool::Eraser);
    e.handle_event(EditorEvent::StrokeStart { x: 5.0, y: 5.0, pointers: 1 }).unwrap();
    e.handle_event(EditorEvent::StrokeEnd).unwrap();
    assert!(e.project.canvas.get_pixel(0, 0).unwrap().is_transparent());
    assert_eq!(e.project.canvas.get_pixel(0, 1).unwrap(), Color::rgb(10, 20, 30));
}

#[test]
fn fill_acts_on_down_point_only() {
    let mut e = editor();
    e.select_tool(Tool::Fill);
    e.handle_event(EditorEvent::StrokeStart { x: 5.0, y: 5.0, pointers: 1 }).unwrap();
    let after_down = e.project.canvas.clone();
    // Dragging a fill must not trigger more fills.
    e.handle_event(EditorEvent::StrokeMove { x: 150.0, y: 150.0, pointers: 1 }).unwrap();
    e.handle_event(EditorEvent::StrokeEnd).unwrap();
    assert_eq!(e.project.canvas, after_down);
    // The whole blank canvas took the active color in one call.
    let color = active(&e);
    assert!(e.project.canvas.pixels().iter().all(|p| *p == color));
}

#[test]
fn eyedropper_routes_pick_into_palette() {
    let mut e = editor();
    let teal = Color::rgb(0, 128, 128);
    e.project.canvas.set_pixel(2, 4, teal);
    e.select_tool(Tool::Eyedropper);
    assert_ne!(active(&e), teal);
    e.handle_event(EditorEvent::StrokeStart { x: 45.0, y: 25.0, pointers: 1 }).unwrap();
    e.handle_event(EditorEvent::StrokeEnd).unwrap();
    assert_eq!(active(&e), teal);
    assert_eq!(e.project.palette.recent().next(), Some(teal));
}

#[test]
fn move_tool_drags_content_with_undo() {
    let mut e = editor();
    let px = Color::rgb(200, 10, 10);
    e.project.canvas.set_pixel(8, 8, px);
    let before = e.project.canvas.clone();

    e.select_tool(Tool::Move);
    // Down on (8, 8), drag two cells right and one down.
    e.handle_event(EditorEvent::StrokeStart { x: 85.0, y: 85.0, pointers: 1 }).unwrap();
    e.handle_event(EditorEvent::StrokeMove { x: 105.0, y: 95.0, pointers: 1 }).unwrap();
    e.handle_event(EditorEvent::StrokeEnd).unwrap();

    assert!(e.project.canvas.get_pixel(8, 8).unwrap().is_transparent());
    assert_eq!(e.project.canvas.get_pixel(9, 10).unwrap(), px);

    e.handle_event(EditorEvent::Undo).unwrap();
    assert_eq!(e.project.canvas, before);
}

#[test]
fn rotate_and_flips_are_undoable_gestures() {
    let mut e = editor();
    e.project.canvas.set_pixel(0, 3, Color::rgb(1, 2, 3));
    let before = e.project.canvas.clone();

    e.handle_event(EditorEvent::Rotate90).unwrap();
    assert_ne!(e.project.canvas, before);
    e.handle_event(EditorEvent::Undo).unwrap();
    assert_eq!(e.project.canvas, before);

    e.handle_event(EditorEvent::FlipHorizontal).unwrap();
    e.handle_event(EditorEvent::FlipVertical).unwrap();
    e.handle_event(EditorEvent::Undo).unwrap();
    e.handle_event(EditorEvent::Undo).unwrap();
    assert_eq!(e.project.canvas, before);
}

#[test]
fn resize_event_validates_dimensions() {
    let mut e = editor();
    let before = e.project.canvas.clone();
    assert!(e.handle_event(EditorEvent::Resize { width: 0, height: 8 }).is_err());
    assert_eq!(e.project.canvas, before);
    // Invalid resize must not have polluted history.
    assert!(!e.project.history.can_undo());

    e.handle_event(EditorEvent::Resize { width: 8, height: 8 }).unwrap();
    assert_eq!(e.project.canvas.width(), 8);
    e.handle_event(EditorEvent::Undo).unwrap();
    assert_eq!(e.project.canvas, before);
}
