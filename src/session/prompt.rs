//! Modal prompt contract
//!
//! The annotator never blocks on a dialog itself. When it needs a value it
//! hands a [`PromptRequest`] to whatever [`Prompt`] the host provides and
//! gets back either an answer or a cancellation.

use crate::domain::{Point, Units};

/// What the annotator is asking for
#[derive(Debug, Clone, PartialEq)]
pub enum PromptRequest {
    /// Length of the edge from `from` toward the clicked point
    EdgeLength { from: Point, clicked: Point, unit: String },
    /// Free-text name for the polygon about to be committed
    PolygonName { vertices: usize },
}

impl PromptRequest {
    /// Question shown to the user
    pub fn question(&self) -> String {
        match self {
            PromptRequest::EdgeLength { unit, .. } => {
                format!("Enter the length of the side ({unit}):")
            }
            PromptRequest::PolygonName { .. } => "Enter a name for the polygon:".to_string(),
        }
    }
}

/// Answer to a [`PromptRequest`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    Answer(String),
    Cancelled,
}

/// Host side of a modal dialog
pub trait Prompt {
    fn request(&mut self, request: &PromptRequest) -> PromptResponse;
}

/// Parse a length answer in user units
///
/// Surrounding whitespace is ignored. Anything that is not a finite number
/// (including an empty answer) is rejected.
pub fn parse_length(answer: &str) -> Option<f64> {
    answer
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|length| length.is_finite())
}

/// Turn an edge length request into a length in canvas pixels
///
/// `Ok(None)` means the user cancelled, `Err` carries the rejected answer.
pub fn request_edge_length(
    prompt: &mut dyn Prompt,
    from: Point,
    clicked: Point,
    units: &Units,
) -> Result<Option<f64>, String> {
    let request = PromptRequest::EdgeLength {
        from,
        clicked,
        unit: units.name.clone(),
    };
    match prompt.request(&request) {
        PromptResponse::Answer(answer) => match parse_length(&answer) {
            Some(length) => Ok(Some(units.to_pixels(length))),
            None => Err(answer),
        },
        PromptResponse::Cancelled => Ok(None),
    }
}

/// Ask for a polygon name; blank answers and cancellations give `None`
pub fn request_polygon_name(prompt: &mut dyn Prompt, vertices: usize) -> Option<String> {
    match prompt.request(&PromptRequest::PolygonName { vertices }) {
        PromptResponse::Answer(answer) => {
            let name = answer.trim();
            (!name.is_empty()).then(|| name.to_string())
        }
        PromptResponse::Cancelled => None,
    }
}

/// Prompt answering from a fixed queue, for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    pub answers: std::collections::VecDeque<PromptResponse>,
    pub asked: Vec<PromptRequest>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            answers: answers
                .into_iter()
                .map(|a| match a {
                    Some(text) => PromptResponse::Answer(text.into()),
                    None => PromptResponse::Cancelled,
                })
                .collect(),
            asked: Vec::new(),
        }
    }

    /// A prompt that cancels everything
    pub fn cancelling() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    fn request(&mut self, request: &PromptRequest) -> PromptResponse {
        self.asked.push(request.clone());
        self.answers.pop_front().unwrap_or(PromptResponse::Cancelled)
    }
}
