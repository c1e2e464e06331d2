//! Input and output seams of the calculator.
//!
//! The calculation reads its five fields from an [`InputSource`] and reports
//! through a [`ResultSink`], so it runs the same against a page, a form post
//! or a test double.

use crate::calculator::formula::{assess, Assessment, CalcError, Measurements};
use std::collections::HashMap;

/// Element that receives the result line.
pub const RESULT_ELEMENT_ID: &str = "result";
/// Element positioned along the scale.
pub const MARKER_ELEMENT_ID: &str = "marker";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Sex,
    Height,
    Neck,
    Waist,
    Hip,
}

impl Field {
    pub const ALL: [Field; 5] = [Field::Sex, Field::Height, Field::Neck, Field::Waist, Field::Hip];

    /// Form field name.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Sex => "sex",
            Field::Height => "height",
            Field::Neck => "neck",
            Field::Waist => "waist",
            Field::Hip => "hip",
        }
    }
}

/// Key-value provider for the raw field values.
pub trait InputSource {
    fn field(&self, field: Field) -> Option<String>;
}

impl InputSource for HashMap<String, String> {
    fn field(&self, field: Field) -> Option<String> {
        self.get(field.name()).cloned()
    }
}

impl InputSource for HashMap<&str, &str> {
    fn field(&self, field: Field) -> Option<String> {
        self.get(field.name()).map(|v| v.to_string())
    }
}

/// Where the calculator writes its output.
pub trait ResultSink {
    /// Replace the result element's content.
    fn write_result(&mut self, html: &str);

    /// Move the marker to `position` percent of the scale.
    fn move_marker(&mut self, position: u8);

    /// Show a blocking message to the user.
    fn alert(&mut self, message: &str);
}

/// Read the inputs, compute, and write the result and marker.
///
/// On a validation failure the sink only receives the alert.
pub fn calculate<I, S>(input: &I, sink: &mut S) -> Result<Assessment, CalcError>
where
    I: InputSource + ?Sized,
    S: ResultSink + ?Sized,
{
    let measurements = Measurements::read(input);

    match assess(&measurements) {
        Ok(assessment) => {
            sink.write_result(&assessment.summary_html());
            sink.move_marker(assessment.marker_position);
            Ok(assessment)
        }
        Err(err) => {
            sink.alert(&err.to_string());
            Err(err)
        }
    }
}

/// Sink that renders into an HTML fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlSink {
    pub result: Option<String>,
    pub marker: Option<u8>,
    pub alert: Option<String>,
}

impl HtmlSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The result element followed by the marker element.
    pub fn render(&self) -> String {
        let marker_style = self
            .marker
            .map(|position| format!(" style=\"left: {}%\"", position))
            .unwrap_or_default();

        format!(
            "<div id=\"{}\">{}</div>\n<div id=\"{}\"{}></div>\n",
            RESULT_ELEMENT_ID,
            self.result.as_deref().unwrap_or(""),
            MARKER_ELEMENT_ID,
            marker_style,
        )
    }
}

impl ResultSink for HtmlSink {
    fn write_result(&mut self, html: &str) {
        self.result = Some(html.to_string());
    }

    fn move_marker(&mut self, position: u8) {
        self.marker = Some(position);
    }

    fn alert(&mut self, message: &str) {
        self.alert = Some(message.to_string());
    }
}
