use glam::Vec2;
use roxmltree::Node;
use crate::map::TsxParseError;
use super::Properties;

#[derive(Copy, Clone, Eq, PartialEq, Default, Debug)]
pub enum DrawOrder {
    #[default]
    TopDown,
    Index,
}

impl DrawOrder {
    pub fn parse(str: &str) -> Result<Self, TsxParseError> {
        match str {
            "topdown" => Ok(Self::TopDown),
            "index" => Ok(Self::Index),
            _ => Err(TsxParseError::invalid_value("draworder", str))
        }
    }
}

/// Collision editor output of a single tile: `<objectgroup>`.
#[derive(Clone, Default, Debug)]
pub struct ObjectGroup {
    pub id: Option<u32>,
    pub name: String,
    pub draw_order: DrawOrder,
    pub objects: Vec<Object>,
    pub properties: Properties,
}

impl ObjectGroup {
    pub fn parse(group_node: Node) -> Result<Self, TsxParseError> {
        let mut group = ObjectGroup::default();
        for attribute in group_node.attributes() {
            let value = attribute.value();
            match attribute.name() {
                "id" => group.id = Some(value.parse()?),
                "name" => group.name = String::from(value),
                "draworder" => group.draw_order = DrawOrder::parse(value)?,
                _ => {}
            }
        }
        for child in group_node.children() {
            match child.tag_name().name() {
                "object" => group.objects.push(Object::parse(child)?),
                "properties" => group.properties = Properties::parse(child)?,
                _ => {}
            }
        }
        Ok(group)
    }
}

/// Geometry of an object. Polygon and polyline points are relative to the object position.
#[derive(Clone, PartialEq, Default, Debug)]
pub enum ObjectKind {
    #[default]
    Rectangle,
    Ellipse,
    Point,
    Polygon(Vec<Vec2>),
    Polyline(Vec<Vec2>),
    Text(String),
}

impl ObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Ellipse => "ellipse",
            Self::Point => "point",
            Self::Polygon(_) => "polygon",
            Self::Polyline(_) => "polyline",
            Self::Text(_) => "text",
        }
    }
}

/// A 1:1 mapping of `<object>`.
#[derive(Clone, PartialEq, Debug)]
pub struct Object {
    pub id: u32,
    pub name: String,
    /// Tiled writes `type` before 1.9 and `class` after. Either lands here.
    pub class: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Degrees, clockwise.
    pub rotation: f32,
    pub visible: bool,
    pub kind: ObjectKind,
    pub properties: Properties,
}

impl Default for Object {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            class: String::new(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            visible: true,
            kind: ObjectKind::Rectangle,
            properties: Properties::default(),
        }
    }
}

impl Object {
    pub fn parse(object_node: Node) -> Result<Self, TsxParseError> {
        let mut object = Object::default();
        for attribute in object_node.attributes() {
            let value = attribute.value();
            match attribute.name() {
                "id" => object.id = value.parse()?,
                "name" => object.name = String::from(value),
                "type" | "class" => object.class = String::from(value),
                "x" => object.x = value.parse()?,
                "y" => object.y = value.parse()?,
                "width" => object.width = value.parse()?,
                "height" => object.height = value.parse()?,
                "rotation" => object.rotation = value.parse()?,
                "visible" => object.visible = match value {
                    "0" => false,
                    "1" => true,
                    _ => return Err(TsxParseError::invalid_value("visible", value)),
                },
                _ => {}
            }
        }
        if object.width < 0.0 || object.height < 0.0 {
            return Err(TsxParseError::NegativeSize { object_id: object.id });
        }

        for child in object_node.children() {
            match child.tag_name().name() {
                "ellipse" => object.kind = ObjectKind::Ellipse,
                "point" => object.kind = ObjectKind::Point,
                "polygon" => {
                    let points = parse_points(child)?;
                    if points.len() < 3 {
                        return Err(TsxParseError::DegeneratePolygon { object_id: object.id, count: points.len() });
                    }
                    object.kind = ObjectKind::Polygon(points);
                },
                "polyline" => object.kind = ObjectKind::Polyline(parse_points(child)?),
                "text" => object.kind = ObjectKind::Text(String::from(child.text().unwrap_or(""))),
                "properties" => object.properties = Properties::parse(child)?,
                _ => {}
            }
        }
        Ok(object)
    }
}

fn parse_points(points_node: Node) -> Result<Vec<Vec2>, TsxParseError> {
    let points = points_node
        .attribute("points")
        .ok_or_else(|| TsxParseError::missing_attribute(points_node.tag_name().name(), "points"))?;
    points
        .split_whitespace()
        .map(parse_point)
        .collect()
}

fn parse_point(pair: &str) -> Result<Vec2, TsxParseError> {
    let invalid = || TsxParseError::InvalidPoint { value: String::from(pair) };
    let (x, y) = pair.split_once(',').ok_or_else(invalid)?;
    let x: f32 = x.parse().map_err(|_| invalid())?;
    let y: f32 = y.parse().map_err(|_| invalid())?;
    Ok(Vec2::new(x, y))
}

#[cfg(test)]
mod test {
    use glam::Vec2;
    use roxmltree::Document;
    use crate::map::TsxParseError;
    use super::{DrawOrder, Object, ObjectGroup, ObjectKind};

    #[test]
    fn rectangle_and_untyped() {
        let xml = r#"
            <objectgroup draworder="index" id="2">
                <object id="1" x="0" y="0" width="32" height="32"/>
                <object id="2" type="Hitbox" x="15" y="0" width="17" height="32"/>
            </objectgroup>
        "#;
        let doc = Document::parse(xml).unwrap();
        let group = ObjectGroup::parse(doc.root_element()).unwrap();
        assert_eq!(Some(2), group.id);
        assert_eq!(DrawOrder::Index, group.draw_order);
        assert_eq!(2, group.objects.len());
        assert_eq!("", group.objects[0].class);

        let hitbox = &group.objects[1];
        assert_eq!("Hitbox", hitbox.class);
        assert_eq!(ObjectKind::Rectangle, hitbox.kind);
        assert_eq!(15.0, hitbox.x);
        assert_eq!(17.0, hitbox.width);
    }

    #[test]
    fn polygon_points() {
        let xml = r#"
            <object id="1" type="Hitbox" x="31.8638" y="-0.291438">
                <polygon points="0,0 -31.8638,32.1553 0,32.2524"/>
            </object>
        "#;
        let doc = Document::parse(xml).unwrap();
        let object = Object::parse(doc.root_element()).unwrap();
        let ObjectKind::Polygon(points) = &object.kind else { panic!("Expected polygon") };
        assert_eq!(3, points.len());
        assert_eq!(Vec2::new(-31.8638, 32.1553), points[1]);
        assert_eq!(-0.291438, object.y);
    }

    #[test]
    fn rotated_ellipse() {
        let xml = r#"
            <object id="1" class="Hitbox" x="21.0102" y="-17.8858" width="148.684" height="82.9259" rotation="23">
                <ellipse/>
            </object>
        "#;
        let doc = Document::parse(xml).unwrap();
        let object = Object::parse(doc.root_element()).unwrap();
        assert_eq!(ObjectKind::Ellipse, object.kind);
        assert_eq!("Hitbox", object.class);
        assert_eq!(23.0, object.rotation);
    }

    #[test]
    fn hidden_object() {
        let xml = r#"<object id="3" type="Hitbox" x="0" y="0" width="8" height="8" visible="0"/>"#;
        let doc = Document::parse(xml).unwrap();
        let object = Object::parse(doc.root_element()).unwrap();
        assert!(!object.visible);
        assert_eq!(ObjectKind::Rectangle, object.kind);

        let doc = Document::parse(r#"<object id="3"/>"#).unwrap();
        assert!(Object::parse(doc.root_element()).unwrap().visible);

        let doc = Document::parse(r#"<object id="3" visible="no"/>"#).unwrap();
        assert!(matches!(
            Object::parse(doc.root_element()),
            Err(TsxParseError::InvalidAttributeValue { .. })
        ));
    }

    #[test]
    fn malformed_geometry() {
        let two_points = r#"<object id="4"><polygon points="0,0 1,1"/></object>"#;
        let doc = Document::parse(two_points).unwrap();
        assert!(matches!(
            Object::parse(doc.root_element()),
            Err(TsxParseError::DegeneratePolygon { object_id: 4, count: 2 })
        ));

        let bad_pair = r#"<object id="5"><polygon points="0,0 1;1 2,2"/></object>"#;
        let doc = Document::parse(bad_pair).unwrap();
        assert!(matches!(Object::parse(doc.root_element()), Err(TsxParseError::InvalidPoint { .. })));

        let negative = r#"<object id="6" width="-1" height="3"/>"#;
        let doc = Document::parse(negative).unwrap();
        assert!(matches!(Object::parse(doc.root_element()), Err(TsxParseError::NegativeSize { object_id: 6 })));
    }
}
