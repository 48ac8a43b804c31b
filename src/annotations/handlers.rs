//! Annotator message handlers
//!
//! Applies a [`Msg`] to the annotation state and reports what the user
//! should be told.

use crate::config::PolymarkConfig;
use crate::export;
use crate::session::messages::{Msg, PointerMsg, ToolbarMsg};
use crate::session::prompt::Prompt;
use crate::session::state::{AnnotationState, Placement, Warning};

/// Feedback for the user after a message
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Nothing worth showing
    None,
    Info(String),
    Warning(Warning),
    /// One line per committed polygon
    Listing(Vec<String>),
}

/// Handle a Msg, modifying the annotation state
///
/// Validation problems come back as [`Notice::Warning`]; only export I/O
/// failures are errors.
pub fn handle_msg(
    state: &mut AnnotationState,
    config: &PolymarkConfig,
    prompt: &mut dyn Prompt,
    msg: Msg,
) -> anyhow::Result<Notice> {
    match msg {
        Msg::Toolbar(action) => handle_toolbar(state, config, prompt, action),
        Msg::Pointer(event) => Ok(handle_pointer(state, prompt, event)),
        Msg::List => Ok(Notice::Listing(list_polygons(state))),
    }
}

// ============================================================================
// Toolbar handlers
// ============================================================================

fn handle_toolbar(
    state: &mut AnnotationState,
    config: &PolymarkConfig,
    prompt: &mut dyn Prompt,
    action: ToolbarMsg,
) -> anyhow::Result<Notice> {
    let notice = match action {
        ToolbarMsg::StartDrawing => {
            state.begin_drawing();
            Notice::Info("Drawing. Click to add points.".to_string())
        }
        ToolbarMsg::CreatePolygon => match state.commit_polygon(prompt) {
            Ok(id) => match state.polygons.get(&id) {
                Some(polygon) => Notice::Info(format!(
                    "Created {} ({})",
                    polygon.display_name(),
                    state.units.format_area(polygon.area)
                )),
                None => Notice::None,
            },
            Err(warning) => Notice::Warning(warning),
        },
        ToolbarMsg::ClearCanvas => {
            state.clear();
            Notice::None
        }
        ToolbarMsg::Undo => {
            state.undo();
            Notice::None
        }
        ToolbarMsg::DeleteSelected => match state.delete_selected() {
            Some(polygon) => Notice::Info(format!("Deleted {}", polygon.display_name())),
            None => Notice::None,
        },
        ToolbarMsg::SaveAsPng(path) => {
            let written = export::export_png(state, config, path.as_deref())?;
            Notice::Info(format!("Saved {}", written.display()))
        }
    };
    Ok(notice)
}

// ============================================================================
// Pointer handlers
// ============================================================================

fn handle_pointer(state: &mut AnnotationState, prompt: &mut dyn Prompt, event: PointerMsg) -> Notice {
    match event {
        PointerMsg::Move(pointer) => {
            state.preview_edge(pointer);
            Notice::None
        }
        PointerMsg::Down(pointer) if state.is_drawing() => match state.add_point(pointer, prompt) {
            Ok(Placement::Rejected { warning, .. }) | Err(warning) => Notice::Warning(warning),
            Ok(Placement::Snapped { clicked, point }) => Notice::Info(format!(
                "Moved ({:.1}, {:.1}) to ({:.1}, {:.1})",
                clicked.x, clicked.y, point.x, point.y
            )),
            Ok(Placement::Unsnapped(point)) => Notice::Info(format!(
                "Length not set, kept clicked position ({:.1}, {:.1})",
                point.x, point.y
            )),
            Ok(Placement::Raw(_)) => Notice::None,
        },
        PointerMsg::Down(pointer) => {
            state.select_at(pointer);
            match state.selected_polygon() {
                Some(polygon) => Notice::Info(format!("Selected {}", polygon.display_name())),
                None => Notice::None,
            }
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn list_polygons(state: &AnnotationState) -> Vec<String> {
    state
        .polygons
        .values()
        .map(|polygon| {
            let sides: Vec<String> = polygon
                .edge_lengths()
                .into_iter()
                .map(|length| state.units.format_length(length))
                .collect();
            let marker = if state.selected == Some(polygon.id) {
                "*"
            } else {
                " "
            };
            format!(
                "{marker} {} {}: {}, sides [{}]",
                polygon.id,
                polygon.display_name(),
                state.units.format_area(polygon.area),
                sides.join(", ")
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point;
    use crate::session::prompt::ScriptedPrompt;

    fn run(
        state: &mut AnnotationState,
        prompt: &mut ScriptedPrompt,
        msgs: impl IntoIterator<Item = Msg>,
    ) -> Vec<Notice> {
        let config = PolymarkConfig::default();
        msgs.into_iter()
            .map(|msg| handle_msg(state, &config, prompt, msg).unwrap())
            .collect()
    }

    #[test]
    fn test_draw_square_session() {
        let mut state = AnnotationState::default();
        let mut prompt = ScriptedPrompt::new([Some("10"), Some("10"), Some("10"), Some("Pad")]);
        let notices = run(
            &mut state,
            &mut prompt,
            [
                Msg::start_drawing(),
                Msg::pointer_down(0.0, 0.0),
                Msg::pointer_move(9.0, 1.0),
                Msg::pointer_down(9.0, 1.0e-9),
                Msg::pointer_down(10.0, 12.0),
                Msg::pointer_down(-1.0, 10.0),
                Msg::create_polygon(),
            ],
        );

        assert_eq!(
            notices[3],
            Notice::Info("Moved (9.0, 0.0) to (10.0, 0.0)".to_string())
        );
        assert_eq!(
            notices.last(),
            Some(&Notice::Info("Created Pad (100.00 sq ft)".to_string()))
        );
        assert!(!state.is_drawing());
        let poly = state.polygons.values().next().unwrap();
        for (len, expected) in poly.edge_lengths().iter().zip([10.0, 10.0, 10.0, 10.0]) {
            assert!((len - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_invalid_length_warns_and_keeps_drawing() {
        let mut state = AnnotationState::default();
        let mut prompt = ScriptedPrompt::new([Some("abc")]);
        let notices = run(
            &mut state,
            &mut prompt,
            [
                Msg::start_drawing(),
                Msg::pointer_down(1.0, 1.0),
                Msg::pointer_down(40.0, 3.0),
            ],
        );
        assert_eq!(
            notices[2],
            Notice::Warning(Warning::InvalidLength("abc".to_string()))
        );
        assert_eq!(state.points(), &[Point::new(1.0, 1.0), Point::new(40.0, 3.0)]);
        assert!(state.is_drawing());
    }

    #[test]
    fn test_cancelled_length_keeps_clicked_position() {
        let mut state = AnnotationState::default();
        let mut prompt = ScriptedPrompt::cancelling();
        let notices = run(
            &mut state,
            &mut prompt,
            [
                Msg::start_drawing(),
                Msg::pointer_down(1.0, 1.0),
                Msg::pointer_down(40.0, 3.5),
            ],
        );
        assert_eq!(notices[1], Notice::None);
        assert_eq!(
            notices[2],
            Notice::Info("Length not set, kept clicked position (40.0, 3.5)".to_string())
        );
        assert_eq!(state.points(), &[Point::new(1.0, 1.0), Point::new(40.0, 3.5)]);
    }

    #[test]
    fn test_create_with_too_few_points_warns() {
        let mut state = AnnotationState::default();
        let mut prompt = ScriptedPrompt::cancelling();
        let notices = run(
            &mut state,
            &mut prompt,
            [
                Msg::start_drawing(),
                Msg::pointer_down(1.0, 1.0),
                Msg::create_polygon(),
            ],
        );
        assert_eq!(
            notices[2],
            Notice::Warning(Warning::TooFewPoints { count: 1 })
        );
        assert!(state.is_drawing());
    }

    #[test]
    fn test_idle_click_selects_and_delete_removes() {
        let mut state = AnnotationState::default();
        let mut prompt = ScriptedPrompt::new([None, None, Some("Yard")]);
        run(
            &mut state,
            &mut prompt,
            [
                Msg::start_drawing(),
                Msg::pointer_down(0.0, 0.0),
                Msg::pointer_down(30.0, 0.0),
                Msg::pointer_down(0.0, 30.0),
                Msg::create_polygon(),
            ],
        );

        let notices = run(
            &mut state,
            &mut prompt,
            [
                Msg::delete_selected(),
                Msg::pointer_down(5.0, 5.0),
                Msg::delete_selected(),
            ],
        );
        assert_eq!(
            notices,
            vec![
                Notice::None,
                Notice::Info("Selected Yard".to_string()),
                Notice::Info("Deleted Yard".to_string()),
            ]
        );
        assert!(state.polygons.is_empty());
    }

    #[test]
    fn test_undo_and_clear() {
        let mut state = AnnotationState::default();
        let mut prompt = ScriptedPrompt::cancelling();
        run(
            &mut state,
            &mut prompt,
            [
                Msg::undo(),
                Msg::start_drawing(),
                Msg::pointer_down(1.0, 1.0),
                Msg::pointer_down(2.0, 2.0),
                Msg::undo(),
            ],
        );
        assert_eq!(state.points(), &[Point::new(1.0, 1.0)]);

        run(&mut state, &mut prompt, [Msg::clear_canvas()]);
        assert!(!state.is_drawing());
        assert!(state.points().is_empty());
    }

    #[test]
    fn test_list_polygons() {
        let mut state = AnnotationState::default();
        let mut prompt = ScriptedPrompt::new([None, None, None, Some("Deck")]);
        run(
            &mut state,
            &mut prompt,
            [
                Msg::start_drawing(),
                Msg::pointer_down(0.0, 0.0),
                Msg::pointer_down(4.0, 0.0),
                Msg::pointer_down(4.0, 3.0),
                Msg::pointer_down(0.0, 3.0),
                Msg::create_polygon(),
                Msg::pointer_down(1.0, 1.0),
            ],
        );
        let notices = run(&mut state, &mut prompt, [Msg::List]);
        assert_eq!(
            notices,
            vec![Notice::Listing(vec![
                "* #1 Deck: 12.00 sq ft, sides [4.00 ft, 3.00 ft, 4.00 ft, 3.00 ft]".to_string()
            ])]
        );
    }

    #[test]
    fn test_save_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas.png");
        let mut state = AnnotationState::default();
        let mut prompt = ScriptedPrompt::cancelling();
        let config = PolymarkConfig {
            canvas_width: 40,
            canvas_height: 30,
            ..PolymarkConfig::default()
        };
        let notice = handle_msg(
            &mut state,
            &config,
            &mut prompt,
            Msg::save_as_png(Some(path.clone())),
        )
        .unwrap();
        assert_eq!(notice, Notice::Info(format!("Saved {}", path.display())));
        assert!(path.exists());
    }
}
