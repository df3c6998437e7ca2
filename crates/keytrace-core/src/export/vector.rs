use crate::geometry::{KeyPositionRegistry, Point};
use crate::keys::Letter;
use crate::settings::LineSettings;
use crate::trace::{self, MIN_TRACE_LEN, PathCommand, TracePath};
use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{
    Circle, Definitions, Filter, FilterEffectGaussianBlur, FilterEffectMerge,
    FilterEffectMergeNode, Path,
};

const GLOW_FILTER_ID: &str = "glow";

/// Size of the drawing surface being exported.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

fn xy(p: Point) -> (f32, f32) {
    (p.x as f32, p.y as f32)
}

pub fn path_data(path: &TracePath) -> Data {
    path.commands()
        .iter()
        .fold(Data::new(), |data, command| match *command {
            PathCommand::MoveTo(p) => data.move_to(xy(p)),
            PathCommand::LineTo(p) => data.line_to(xy(p)),
        })
}

/// Gaussian blur merged under the source graphic, standing in for a canvas shadow.
fn glow_filter(blur: f64) -> Definitions {
    let filter = Filter::new()
        .set("id", GLOW_FILTER_ID)
        .add(
            FilterEffectGaussianBlur::new()
                .set("stdDeviation", (blur / 2.0) as f32)
                .set("result", "coloredBlur"),
        )
        .add(
            FilterEffectMerge::new()
                .add(FilterEffectMergeNode::new().set("in", "coloredBlur"))
                .add(FilterEffectMergeNode::new().set("in", "SourceGraphic")),
        );
    Definitions::new().add(filter)
}

/// Standalone SVG of the trace, or `None` when fewer than two letters were typed.
///
/// Unlike the live surface, every resolved letter also gets a marker circle of
/// radius `dot_size`.
pub fn render(
    letters: &[Letter],
    registry: &KeyPositionRegistry,
    line: &LineSettings,
    viewport: Viewport,
) -> Option<Document> {
    if letters.len() < MIN_TRACE_LEN {
        return None;
    }

    let (width, height) = (viewport.width as f32, viewport.height as f32);
    let stroke = line.stroke();
    let color = stroke.color.to_string();

    let mut document = Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", (0, 0, width, height));

    if let Some(blur) = stroke.blur {
        document = document.add(glow_filter(blur));
    }

    let mut path = Path::new()
        .set("fill", "none")
        .set("stroke", color.as_str())
        .set("stroke-width", stroke.width as f32)
        .set("stroke-linecap", "round")
        .set("stroke-linejoin", "round")
        .set("d", path_data(&TracePath::build(letters, registry)));
    if !stroke.dash.is_empty() {
        let dashes: Vec<String> = stroke.dash.iter().map(f64::to_string).collect();
        path = path.set("stroke-dasharray", dashes.join(","));
    }
    if stroke.blur.is_some() {
        path = path.set("filter", format!("url(#{GLOW_FILTER_ID})"));
    }
    document = document.add(path);

    for p in trace::markers(letters, registry) {
        let (cx, cy) = xy(p);
        document = document.add(
            Circle::new()
                .set("cx", cx)
                .set("cy", cy)
                .set("r", line.dot_size as f32)
                .set("fill", color.as_str()),
        );
    }

    Some(document)
}
