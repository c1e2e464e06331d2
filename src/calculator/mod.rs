//! Body-fat calculator (U.S. Navy circumference method).
//!
//! ```
//! use fitrelay::calculator::{calculate, Band, HtmlSink};
//! use std::collections::HashMap;
//!
//! let input: HashMap<&str, &str> =
//!     [("sex", "M"), ("height", "180"), ("neck", "38"), ("waist", "85")].into();
//! let mut sink = HtmlSink::new();
//!
//! let assessment = calculate(&input, &mut sink).unwrap();
//! assert_eq!(assessment.percentage, 22.62);
//! assert_eq!(assessment.band, Band::Normal);
//! assert_eq!(sink.marker, Some(65));
//! ```

mod band;
mod formula;
mod function;
mod io;

pub use band::{classify, Band};
pub use formula::{
    assess, body_fat_percentage, parse_measurement, round_two_decimals, Assessment, CalcError,
    Measurements, Sex,
};
pub use function::BodyFatFunction;
pub use io::{calculate, Field, HtmlSink, InputSource, ResultSink, MARKER_ELEMENT_ID, RESULT_ELEMENT_ID};
