//! Turning a command log into something a person can look at.

use std::path::Path;

use kurbo::{Point, Rect, Vec2};
use svg::node::element::{Line, Polygon, Rectangle};
use svg::Document;

use crate::{Cmd, Color, Error};

#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Space left around the drawing, in drawing units.
    pub margin: f64,
    /// The size of the arrowhead marking the turtle, if it's visible.
    pub turtle_size: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            margin: 10.0,
            turtle_size: 8.0,
        }
    }
}

struct Segment {
    from: Point,
    to: Point,
    color: Color,
    width: f64,
}

struct TurtleMark {
    pos: Point,
    heading: f64,
    color: Color,
}

// What's left on the canvas after replaying the whole log.
#[derive(Default)]
struct Canvas {
    background: Option<Color>,
    segments: Vec<Segment>,
    turtle: Option<TurtleMark>,
}

impl Canvas {
    fn replay(cmds: &[Cmd]) -> Canvas {
        let mut ret = Canvas::default();
        for cmd in cmds {
            match cmd {
                Cmd::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    color,
                    width,
                    ..
                } => ret.segments.push(Segment {
                    from: Point::new(*x1, *y1),
                    to: Point::new(*x2, *y2),
                    color: *color,
                    width: *width,
                }),
                Cmd::Turtle {
                    x,
                    y,
                    heading,
                    visible,
                    pencolor,
                } => {
                    ret.turtle = visible.then(|| TurtleMark {
                        pos: Point::new(*x, *y),
                        heading: *heading,
                        color: *pencolor,
                    });
                }
                Cmd::Clear => ret.segments.clear(),
                Cmd::Bg { color } => ret.background = Some(*color),
            }
        }
        ret
    }

    fn arrowhead(mark: &TurtleMark, size: f64) -> [Point; 3] {
        let dir = Vec2::from_angle(mark.heading.to_radians());
        let side = Vec2::new(-dir.y, dir.x);
        let tip = mark.pos + dir * size;
        let base = mark.pos - dir * (size / 2.0);
        [tip, base + side * (size / 2.0), base - side * (size / 2.0)]
    }

    fn bounds(&self, opts: &RenderOptions) -> Rect {
        let mut points = self
            .segments
            .iter()
            .flat_map(|s| [s.from, s.to])
            .chain(
                self.turtle
                    .iter()
                    .flat_map(|m| Canvas::arrowhead(m, opts.turtle_size)),
            );
        let Some(first) = points.next() else {
            return Rect::new(-100.0, -100.0, 100.0, 100.0);
        };
        let bbox = points.fold(Rect::from_points(first, first), |r, p| r.union_pt(p));
        bbox.inflate(opts.margin, opts.margin)
    }
}

// svg is y-down and the turtle is y-up.
fn flip(p: Point) -> Point {
    Point::new(p.x, -p.y)
}

/// Replays `cmds` into an svg document.
pub fn svg_document(cmds: &[Cmd], opts: &RenderOptions) -> Document {
    let canvas = Canvas::replay(cmds);
    let bounds = canvas.bounds(opts);
    // After flipping, the top edge of the view is the old max_y.
    let (x0, y0) = (bounds.min_x(), -bounds.max_y());
    let (w, h) = (bounds.width(), bounds.height());
    log::debug!(
        "rendering {} segments into {w}x{h} at ({x0}, {y0})",
        canvas.segments.len()
    );

    let mut document = Document::new()
        .set("viewBox", format!("{x0} {y0} {w} {h}"))
        .set("width", w)
        .set("height", h);

    if let Some(bg) = canvas.background {
        document = document.add(
            Rectangle::new()
                .set("x", x0)
                .set("y", y0)
                .set("width", w)
                .set("height", h)
                .set("fill", bg.to_string()),
        );
    }

    for seg in &canvas.segments {
        let (from, to) = (flip(seg.from), flip(seg.to));
        document = document.add(
            Line::new()
                .set("x1", from.x)
                .set("y1", from.y)
                .set("x2", to.x)
                .set("y2", to.y)
                .set("stroke", seg.color.to_string())
                .set("stroke-width", seg.width)
                .set("stroke-linecap", "round"),
        );
    }

    if let Some(mark) = &canvas.turtle {
        let points = Canvas::arrowhead(mark, opts.turtle_size)
            .iter()
            .map(|p| {
                let p = flip(*p);
                format!("{},{}", p.x, p.y)
            })
            .collect::<Vec<_>>()
            .join(" ");
        document = document.add(
            Polygon::new()
                .set("points", points)
                .set("fill", mark.color.to_string()),
        );
    }

    document
}

pub fn save_svg(path: impl AsRef<Path>, cmds: &[Cmd], opts: &RenderOptions) -> Result<(), Error> {
    let document = svg_document(cmds, opts);
    svg::save(path, &document)?;
    Ok(())
}

/// The command log as a JSON array.
pub fn json(cmds: &[Cmd]) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(cmds)?)
}

pub fn save_json(path: impl AsRef<Path>, cmds: &[Cmd]) -> Result<(), Error> {
    std::fs::write(path, json(cmds)?)?;
    Ok(())
}
