use std::num::{ParseFloatError, ParseIntError};
use derive_more::*;

#[derive(Error, Display, From, Debug)]
pub enum TsxParseError {
    XmlError(roxmltree::Error),
    #[display(fmt="{_0}")]
    ParseIntError(ParseIntError),
    #[display(fmt="{_0}")]
    ParseFloatError(ParseFloatError),
    #[display(fmt="Missing tag '{tag_name}'")]
    #[from(ignore)]
    MissingTag { tag_name: String },
    #[display(fmt="Missing attribute '{attribute}' on '{tag_name}'")]
    #[from(ignore)]
    MissingAttribute { tag_name: String, attribute: String },
    #[display(fmt="Invalid value '{value}' for attribute '{attribute}'")]
    #[from(ignore)]
    InvalidAttributeValue { attribute: String, value: String },
    #[display(fmt="Invalid point '{value}'")]
    #[from(ignore)]
    InvalidPoint { value: String },
    #[display(fmt="Tile id {id} appears more than once")]
    #[from(ignore)]
    DuplicateTileId { id: u32 },
    #[display(fmt="Object {object_id} has a polygon with {count} points, at least 3 are required")]
    #[from(ignore)]
    DegeneratePolygon { object_id: u32, count: usize },
    #[display(fmt="Object {object_id} has a negative size")]
    #[from(ignore)]
    NegativeSize { object_id: u32 },
}

impl TsxParseError {
    pub(crate) fn invalid_value(attribute: &str, value: &str) -> Self {
        Self::InvalidAttributeValue {
            attribute: String::from(attribute),
            value: String::from(value),
        }
    }

    pub(crate) fn missing_attribute(tag_name: &str, attribute: &str) -> Self {
        Self::MissingAttribute {
            tag_name: String::from(tag_name),
            attribute: String::from(attribute),
        }
    }
}
