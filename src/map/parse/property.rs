use roxmltree::Node;
use crate::debug::Color;
use crate::map::TsxParseError;

/// Value of a single custom property.
#[derive(Clone, PartialEq, Debug)]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Color(Option<Color>),
    File(String),
    Object(u32),
    Class {
        property_type: String,
        members: Properties,
    },
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) | Self::File(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }
}

/// Custom properties of a tileset, tile, object group or object, in document order.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct Properties(Vec<(String, PropertyValue)>);

impl Properties {

    pub fn parse(properties_node: Node) -> Result<Self, TsxParseError> {
        let mut properties = Vec::new();
        for child in properties_node.children().filter(|child| child.has_tag_name("property")) {
            let name = child
                .attribute("name")
                .ok_or_else(|| TsxParseError::missing_attribute("property", "name"))?;
            properties.push((String::from(name), parse_value(child)?));
        }
        Ok(Self(properties))
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0
            .iter()
            .find(|(property_name, _)| property_name == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn parse_value(property_node: Node) -> Result<PropertyValue, TsxParseError> {
    // Multi-line strings are stored as element text instead of the value attribute.
    let raw = property_node
        .attribute("value")
        .or_else(|| property_node.text())
        .unwrap_or("");
    let kind = property_node.attribute("type").unwrap_or("string");
    let value = match kind {
        "string" => PropertyValue::String(String::from(raw)),
        "int" => PropertyValue::Int(raw.parse()?),
        "float" => PropertyValue::Float(raw.parse()?),
        "bool" => match raw {
            "true" => PropertyValue::Bool(true),
            "false" => PropertyValue::Bool(false),
            _ => return Err(TsxParseError::invalid_value("value", raw)),
        },
        "color" => match raw {
            "" => PropertyValue::Color(None),
            _ => {
                let color = Color::from_argb_str(raw)
                    .ok_or_else(|| TsxParseError::invalid_value("value", raw))?;
                PropertyValue::Color(Some(color))
            },
        },
        "file" => PropertyValue::File(String::from(raw)),
        "object" => PropertyValue::Object(raw.parse()?),
        "class" => {
            let members = match property_node.children().find(|child| child.has_tag_name("properties")) {
                Some(members_node) => Properties::parse(members_node)?,
                None => Properties::default(),
            };
            PropertyValue::Class {
                property_type: String::from(property_node.attribute("propertytype").unwrap_or("")),
                members,
            }
        },
        _ => return Err(TsxParseError::invalid_value("type", kind)),
    };
    Ok(value)
}
