use std::fmt::Write;
use glam::Vec2;
use tracing::instrument;
use crate::config::DebugDrawConfig;
use crate::map::Tileset;
use crate::math::Transform2;
use crate::physics::TileColliders;
use crate::util::HashMap;
use super::{draw_tile, Color, DebugDraw, DebugDrawOptions};

/// [`DebugDraw`] that writes SVG elements.
/// Coordinates are in tile pixels, y down, and are scaled once by the root group.
pub struct SvgCanvas {
    width: f32,
    height: f32,
    scale: f32,
    body: String,
}

impl SvgCanvas {
    /// `width` and `height` are in unscaled pixels.
    pub fn new(width: f32, height: f32, scale: f32) -> Self {
        Self { width, height, scale, body: String::new() }
    }

    /// Finishes the document.
    pub fn into_svg(self) -> String {
        let width = self.width * self.scale;
        let height = self.height * self.scale;
        let mut svg = String::with_capacity(self.body.len() + 256);
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#,
        );
        let _ = writeln!(svg, r##"<rect width="100%" height="100%" fill="#202020"/>"##);
        let _ = writeln!(svg, r#"<g transform="scale({})" stroke-width="1">"#, self.scale);
        svg.push_str(&self.body);
        svg.push_str("</g>\n</svg>\n");
        svg
    }

    fn element(&mut self, element: std::fmt::Arguments<'_>) {
        let _ = self.body.write_fmt(element);
        self.body.push('\n');
    }
}

fn points_attr(vertices: impl IntoIterator<Item = Vec2>) -> String {
    let mut points = String::new();
    for (i, vertex) in vertices.into_iter().enumerate() {
        if i > 0 { points.push(' ') }
        let _ = write!(points, "{:.2},{:.2}", vertex.x, vertex.y);
    }
    points
}

fn stroke(color: Color) -> String {
    format!(r#"fill="none" stroke="{}" stroke-opacity="{}""#, color.to_hex_string(), color.a)
}

fn fill(color: Color) -> String {
    format!(
        r#"fill="{hex}" fill-opacity="{}" stroke="{hex}""#,
        color.a * 0.5,
        hex = color.to_hex_string(),
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

impl DebugDraw for SvgCanvas {
    fn draw_polygon(&mut self, vertices: &[Vec2], color: Color) {
        let points = points_attr(vertices.iter().copied());
        self.element(format_args!(r#"<polygon points="{points}" {}/>"#, stroke(color)));
    }

    fn draw_solid_polygon(&mut self, transform: Transform2, vertices: &[Vec2], radius: f32, color: Color) {
        let points = points_attr(vertices.iter().map(|vertex| transform.transform_point(*vertex)));
        if radius > 0.0 {
            self.element(format_args!(
                r#"<polygon points="{points}" {} stroke-width="{}" stroke-linejoin="round"/>"#,
                fill(color),
                radius * 2.0,
            ));
        }
        else {
            self.element(format_args!(r#"<polygon points="{points}" {}/>"#, fill(color)));
        }
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.element(format_args!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" {}/>"#,
            center.x, center.y, radius, stroke(color),
        ));
    }

    fn draw_solid_circle(&mut self, transform: Transform2, radius: f32, color: Color) {
        let center = transform.translation;
        self.element(format_args!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" {}/>"#,
            center.x, center.y, radius, fill(color),
        ));
        let edge = transform.transform_point(Vec2::new(radius, 0.0));
        self.draw_segment(center, edge, color);
    }

    fn draw_solid_capsule(&mut self, p1: Vec2, p2: Vec2, radius: f32, color: Color) {
        self.element(format_args!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-opacity="{}" stroke-width="{:.2}" stroke-linecap="round"/>"#,
            p1.x, p1.y, p2.x, p2.y, color.to_hex_string(), color.a * 0.5, radius * 2.0,
        ));
    }

    fn draw_segment(&mut self, p1: Vec2, p2: Vec2, color: Color) {
        self.element(format_args!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" {}/>"#,
            p1.x, p1.y, p2.x, p2.y, stroke(color),
        ));
    }

    fn draw_point(&mut self, point: Vec2, size: f32, color: Color) {
        self.element(format_args!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}"/>"#,
            point.x, point.y, size * 0.5, color.to_hex_string(),
        ));
    }

    fn draw_string(&mut self, point: Vec2, text: &str, color: Color) {
        self.element(format_args!(
            r#"<text x="{:.2}" y="{:.2}" fill="{}" font-family="monospace" font-size="6">{}</text>"#,
            point.x, point.y, color.to_hex_string(), escape(text),
        ));
    }
}

/// Lays every tile of the tileset out on a grid and draws it.
/// `colliders` should be built in pixel space. Tiles without an entry get no colliders.
#[instrument(skip_all)]
pub fn render_tileset_svg(tileset: &Tileset, colliders: &[TileColliders], config: &DebugDrawConfig) -> String {
    let options = DebugDrawOptions::from(config);
    let by_id: HashMap<u32, &TileColliders> = colliders
        .iter()
        .map(|tile_colliders| (tile_colliders.tile_id, tile_colliders))
        .collect();

    // Every cell fits the largest tile.
    let (cell_width, cell_height) = tileset
        .tiles()
        .map(|tile| tileset.tile_size(tile.id))
        .fold((tileset.tile_width, tileset.tile_height), |(w, h), (tw, th)| (w.max(tw), h.max(th)));
    let padding = config.padding;
    let cell = Vec2::new(cell_width as f32 + padding, cell_height as f32 + padding);
    let columns = config.columns.max(1) as usize;
    let tile_count = tileset.tiles.len();
    let rows = (tile_count + columns - 1) / columns;
    let used_columns = tile_count.min(columns);

    let width = padding + used_columns as f32 * cell.x;
    let height = padding + rows as f32 * cell.y;
    let mut canvas = SvgCanvas::new(width, height, config.scale);
    for (index, tile) in tileset.tiles().enumerate() {
        let column = (index % columns) as f32;
        let row = (index / columns) as f32;
        let offset = Vec2::splat(padding) + Vec2::new(column, row) * cell;
        let size = tileset.tile_size(tile.id);
        let tile_colliders = by_id.get(&tile.id).copied();
        draw_tile(&mut canvas, tile, size, tile_colliders, offset, &options);
    }
    log::debug!("Rendered {tile_count} tiles of '{}' to a {width}x{height} SVG", tileset.name);
    canvas.into_svg()
}

#[cfg(test)]
mod test {
    use glam::Vec2;
    use roxmltree::Document;
    use crate::config::{DebugDrawConfig, LoaderConfig, PhysicsConfig};
    use crate::debug::{Color, DebugDraw};
    use crate::map::{parse, Tileset};
    use crate::physics::ColliderBuilder;
    use super::{render_tileset_svg, SvgCanvas};

    #[test]
    fn canvas_elements() {
        let mut canvas = SvgCanvas::new(10.0, 20.0, 2.0);
        canvas.draw_polygon(&[Vec2::ZERO, Vec2::X, Vec2::Y], Color::from_hex(0xFF0000));
        canvas.draw_string(Vec2::ZERO, "a<b", Color::WHITE);
        let svg = canvas.into_svg();
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="40""#));
        assert!(svg.contains(r##"<polygon points="0.00,0.00 1.00,0.00 0.00,1.00" fill="none" stroke="#ff0000""##));
        assert!(svg.contains(">a&lt;b</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn renders_objects_tileset() {
        let doc = Document::parse(include_str!("../../assets/tilesets/debug_tileset_objects.tsx")).unwrap();
        let parsed = parse::Tileset::parse_doc(doc, None).unwrap();
        let tileset = Tileset::from_parsed(parsed, &LoaderConfig::default()).unwrap();
        let colliders = ColliderBuilder::new(&PhysicsConfig::pixel_space()).build_tileset(&tileset).unwrap();
        let config = DebugDrawConfig { columns: 3, scale: 1.0, ..DebugDrawConfig::default() };

        let svg = render_tileset_svg(&tileset, &colliders, &config);
        // Two rows of three 222x167 cells with 8px padding.
        assert!(svg.contains(r#"width="698" height="358""#));
        assert_eq!(6, svg.matches("font-family").count());
        // Solid circles from tiles 0 to 2 and the two on tile 4, plus one center point per hitbox.
        assert_eq!(5 + 8, svg.matches("<circle").count());
    }
}
