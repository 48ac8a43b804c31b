use indexmap::IndexMap;

use crate::domain::{Point, Polygon, PolygonId, Units};
use crate::session::prompt::{self, Prompt};

/// User-facing problems. None of these are fatal; the state stays usable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Warning {
    #[error("Invalid length {0:?}. Please enter a numeric value.")]
    InvalidLength(String),
    #[error("A polygon requires at least 3 points (have {count}).")]
    TooFewPoints { count: usize },
    #[error("Not drawing. Press Start Drawing first.")]
    NotDrawing,
}

/// Points collected between Start Drawing and Create Polygon
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawingSession {
    pub points: Vec<Point>,
    /// Pointer position for the rubber-band edge from the last point
    pub preview: Option<Point>,
}

impl DrawingSession {
    /// Edges between consecutive points (not closed)
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Preview edge as (last point, pointer)
    pub fn preview_edge(&self) -> Option<(Point, Point)> {
        Some((*self.points.last()?, self.preview?))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Mode {
    #[default]
    Idle,
    Drawing(DrawingSession),
}

/// Where a clicked point ended up
#[derive(Clone, Debug, PartialEq)]
pub enum Placement {
    /// Kept at the clicked position
    Raw(Point),
    /// Kept at the clicked position because the length prompt was cancelled
    Unsnapped(Point),
    /// Moved along the click direction to the requested length
    Snapped { clicked: Point, point: Point },
    /// Kept at the clicked position because the length answer was unusable
    Rejected { point: Point, warning: Warning },
}

impl Placement {
    pub fn point(&self) -> Point {
        match self {
            Placement::Raw(point)
            | Placement::Unsnapped(point)
            | Placement::Snapped { point, .. }
            | Placement::Rejected { point, .. } => *point,
        }
    }
}

/// The polygon annotator: drawing mode plus committed polygons
#[derive(Clone, Debug, Default)]
pub struct AnnotationState {
    pub mode: Mode,
    pub polygons: IndexMap<PolygonId, Polygon>,
    pub selected: Option<PolygonId>,
    pub units: Units,
    next_id: u64,
}

impl AnnotationState {
    pub fn new(units: Units) -> Self {
        Self {
            units,
            ..Self::default()
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.mode, Mode::Drawing(_))
    }

    /// Current drawing session, if any
    pub fn session(&self) -> Option<&DrawingSession> {
        match &self.mode {
            Mode::Drawing(session) => Some(session),
            Mode::Idle => None,
        }
    }

    fn session_mut(&mut self) -> Option<&mut DrawingSession> {
        match &mut self.mode {
            Mode::Drawing(session) => Some(session),
            Mode::Idle => None,
        }
    }

    /// Points of the session in progress (empty when idle)
    pub fn points(&self) -> &[Point] {
        self.session()
            .map(|s| s.points.as_slice())
            .unwrap_or_default()
    }

    pub fn selected_polygon(&self) -> Option<&Polygon> {
        self.polygons.get(&self.selected?)
    }

    /// Start a fresh session. Committed polygons are untouched.
    pub fn begin_drawing(&mut self) {
        self.mode = Mode::Drawing(DrawingSession::default());
        self.selected = None;
        log::debug!("Drawing started");
    }

    /// Add a clicked point to the session
    ///
    /// From the second point on, the prompt is asked for the edge length and
    /// a valid answer moves the point along the click direction to that
    /// distance from the previous point.
    pub fn add_point(
        &mut self,
        clicked: Point,
        prompt: &mut dyn Prompt,
    ) -> Result<Placement, Warning> {
        let Mode::Drawing(session) = &mut self.mode else {
            return Err(Warning::NotDrawing);
        };
        session.preview = None;

        let Some(&previous) = session.points.last() else {
            session.points.push(clicked);
            log::debug!("First point at ({:.1}, {:.1})", clicked.x, clicked.y);
            return Ok(Placement::Raw(clicked));
        };

        let length = prompt::request_edge_length(prompt, previous, clicked, &self.units);
        let placement = match length {
            Ok(Some(length)) => Placement::Snapped {
                clicked,
                point: previous.project_toward(clicked, length),
            },
            Ok(None) => Placement::Unsnapped(clicked),
            Err(answer) => Placement::Rejected {
                point: clicked,
                warning: Warning::InvalidLength(answer),
            },
        };
        let point = placement.point();
        session.points.push(point);
        log::debug!(
            "Point {} at ({:.1}, {:.1})",
            session.points.len(),
            point.x,
            point.y
        );
        Ok(placement)
    }

    /// Move the rubber-band edge to follow the pointer
    ///
    /// Returns whether a preview edge is shown.
    pub fn preview_edge(&mut self, pointer: Point) -> bool {
        match self.session_mut() {
            Some(session) if !session.points.is_empty() => {
                session.preview = Some(pointer);
                true
            }
            _ => false,
        }
    }

    /// Close the session's points into a polygon
    ///
    /// On failure nothing changes and the session stays open.
    pub fn commit_polygon(&mut self, prompt: &mut dyn Prompt) -> Result<PolygonId, Warning> {
        let count = self.session().ok_or(Warning::NotDrawing)?.points.len();
        if count < 3 {
            return Err(Warning::TooFewPoints { count });
        }

        let name = prompt::request_polygon_name(prompt, count);
        let points = match std::mem::take(&mut self.mode) {
            Mode::Drawing(session) => session.points,
            Mode::Idle => return Err(Warning::NotDrawing),
        };

        self.next_id += 1;
        let id = PolygonId(self.next_id);
        let polygon = Polygon::new(id, name, points, &self.units)
            .ok_or(Warning::TooFewPoints { count })?;
        log::info!(
            "Created {} with {} points, area {}",
            polygon.display_name(),
            polygon.points.len(),
            self.units.format_area(polygon.area)
        );
        self.polygons.insert(id, polygon);
        Ok(id)
    }

    /// Drop the most recent session point
    pub fn undo(&mut self) -> Option<Point> {
        let session = self.session_mut()?;
        let removed = session.points.pop()?;
        if session.points.is_empty() {
            session.preview = None;
        }
        log::debug!("Undid point at ({:.1}, {:.1})", removed.x, removed.y);
        Some(removed)
    }

    /// Abandon the session in progress and the selection
    ///
    /// Committed polygons stay; they are removed one at a time with
    /// [`AnnotationState::delete_selected`].
    pub fn clear(&mut self) {
        self.mode = Mode::Idle;
        self.selected = None;
        log::debug!("Session cleared");
    }

    /// Select the topmost polygon under the pointer
    ///
    /// Only while idle; clicking empty canvas clears the selection.
    pub fn select_at(&mut self, pointer: Point) -> Option<PolygonId> {
        if self.is_drawing() {
            return None;
        }
        self.selected = self
            .polygons
            .values()
            .rev()
            .find(|polygon| polygon.contains(pointer))
            .map(|polygon| polygon.id);
        self.selected
    }

    /// Remove the selected polygon and its labels
    pub fn delete_selected(&mut self) -> Option<Polygon> {
        let id = self.selected.take()?;
        let removed = self.polygons.shift_remove(&id)?;
        log::info!("Deleted {}", removed.display_name());
        Some(removed)
    }
}
