//! Committed polygon annotations
//!
//! A polygon owns its labels: one name/area label at the vertex centroid and
//! one length label per edge at the edge midpoint. Label text is formatted
//! once, at commit time.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::{self, Point};

/// Stable identifier of a committed polygon
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PolygonId(pub u64);

impl fmt::Display for PolygonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Mapping from canvas pixels to real-world units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Units {
    /// Unit suffix shown in labels ("ft")
    pub name: String,
    /// Canvas pixels per unit
    pub pixels_per_unit: f64,
}

impl Default for Units {
    fn default() -> Self {
        // One pixel per foot, as the canvas has always been read
        Self {
            name: "ft".to_string(),
            pixels_per_unit: 1.0,
        }
    }
}

impl Units {
    /// A usable scale is finite and positive
    pub fn is_valid(&self) -> bool {
        self.pixels_per_unit.is_finite() && self.pixels_per_unit > 0.0
    }

    pub fn to_pixels(&self, length: f64) -> f64 {
        length * self.pixels_per_unit
    }

    pub fn from_pixels(&self, pixels: f64) -> f64 {
        pixels / self.pixels_per_unit
    }

    pub fn area_from_pixels(&self, square_pixels: f64) -> f64 {
        square_pixels / (self.pixels_per_unit * self.pixels_per_unit)
    }

    /// "12.50 ft"
    pub fn format_length(&self, pixels: f64) -> String {
        format!("{:.2} {}", self.from_pixels(pixels), self.name)
    }

    /// "100.00 sq ft"
    pub fn format_area(&self, square_pixels: f64) -> String {
        format!("{:.2} sq {}", self.area_from_pixels(square_pixels), self.name)
    }
}

/// Text anchored at its center
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: Point,
}

/// A closed polygon with its derived labels
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub id: PolygonId,
    pub name: Option<String>,
    /// Vertices in drawing order; the ring closes from last to first
    pub points: Vec<Point>,
    /// Area in square canvas pixels
    pub area: f64,
    pub centroid: Point,
    /// Name and area, at the centroid
    pub label: Label,
    /// One per edge, `edge_labels[i]` belongs to `points[i] → points[i + 1]`
    pub edge_labels: Vec<Label>,
}

impl Polygon {
    /// Build a polygon and its labels from at least three points
    ///
    /// Returns `None` for fewer than three points.
    pub fn new(
        id: PolygonId,
        name: Option<String>,
        points: Vec<Point>,
        units: &Units,
    ) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }
        let area = geometry::shoelace_area(&points);
        let centroid = geometry::vertex_centroid(&points)?;

        let text = match &name {
            Some(name) => format!("{}\nArea: {}", name, units.format_area(area)),
            None => format!("Area: {}", units.format_area(area)),
        };
        let label = Label {
            text,
            position: centroid,
        };

        let edge_labels = geometry::edges(&points)
            .map(|(a, b)| Label {
                text: units.format_length(a.distance(b)),
                position: a.midpoint(b),
            })
            .collect();

        Some(Self {
            id,
            name,
            points,
            area,
            centroid,
            label,
            edge_labels,
        })
    }

    /// Edge lengths in canvas pixels, in edge order
    pub fn edge_lengths(&self) -> Vec<f64> {
        geometry::edges(&self.points)
            .map(|(a, b)| a.distance(b))
            .collect()
    }

    pub fn contains(&self, p: Point) -> bool {
        geometry::polygon_contains(&self.points, p)
    }

    /// Name for listings, falling back to the id
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("polygon {}", self.id),
        }
    }
}
