use kurbo::{Point, Vec2};

pub mod cmd;
pub mod color;
pub mod render;

pub use cmd::{Cmd, Screen};
pub use color::Color;
pub use kurbo;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I don't know the color {0:?}")]
    BadColor(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// The highest speed a turtle accepts. Zero means "instant".
pub const MAX_SPEED: u8 = 10;

/// Reduces an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let ret = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if ret >= 360.0 {
        0.0
    } else {
        ret
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Pen {
    down: bool,
    color: Color,
    size: f64,
    speed: u8,
}

impl Default for Pen {
    fn default() -> Self {
        Pen {
            down: true,
            color: Color::PEN,
            size: 2.0,
            speed: 0,
        }
    }
}

/// A drawing cursor.
///
/// The turtle starts at the origin facing east (heading 0), with the y axis pointing up.
/// Headings are in degrees and increase counter-clockwise. Everything the turtle does
/// is recorded on its [`Screen`].
#[derive(Clone, Debug)]
pub struct Turtle {
    pos: Point,
    heading: f64,
    pen: Pen,
    visible: bool,
    screen: Screen,
}

impl Default for Turtle {
    fn default() -> Self {
        Turtle::new()
    }
}

impl Turtle {
    pub fn new() -> Turtle {
        Turtle::with_screen(Screen::default())
    }

    pub fn with_screen(screen: Screen) -> Turtle {
        let mut ret = Turtle {
            pos: Point::ORIGIN,
            heading: 0.0,
            pen: Pen::default(),
            visible: true,
            screen,
        };
        ret.emit_state();
        ret
    }

    fn emit_state(&mut self) {
        self.screen.push(Cmd::Turtle {
            x: self.pos.x,
            y: self.pos.y,
            heading: self.heading,
            visible: self.visible,
            pencolor: self.pen.color,
        });
    }

    fn line_to(&mut self, target: Point) {
        if self.pen.down {
            self.screen.push(Cmd::Line {
                x1: self.pos.x,
                y1: self.pos.y,
                x2: target.x,
                y2: target.y,
                color: self.pen.color,
                width: self.pen.size,
                speed: self.pen.speed,
            });
        }
        self.pos = target;
        self.emit_state();
    }

    pub fn position(&self) -> Point {
        self.pos
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn is_down(&self) -> bool {
        self.pen.down
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn color(&self) -> Color {
        self.pen.color
    }

    pub fn pen_size(&self) -> f64 {
        self.pen.size
    }

    pub fn speed(&self) -> u8 {
        self.pen.speed
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn into_screen(self) -> Screen {
        self.screen
    }

    pub fn forward(&mut self, dist: f64) {
        let target = self.pos + Vec2::from_angle(self.heading.to_radians()) * dist;
        log::trace!("forward {dist} to {target:?}");
        self.line_to(target);
    }

    pub fn back(&mut self, dist: f64) {
        self.forward(-dist);
    }

    pub fn left(&mut self, deg: f64) {
        self.heading = normalize_degrees(self.heading + deg);
        self.emit_state();
    }

    pub fn right(&mut self, deg: f64) {
        self.heading = normalize_degrees(self.heading - deg);
        self.emit_state();
    }

    pub fn goto(&mut self, target: impl Into<Point>) {
        self.line_to(target.into());
    }

    pub fn set_heading(&mut self, deg: f64) {
        self.heading = normalize_degrees(deg);
        self.emit_state();
    }

    pub fn home(&mut self) {
        self.goto(Point::ORIGIN);
        self.heading = 0.0;
        self.emit_state();
    }

    pub fn pen_up(&mut self) {
        self.pen.down = false;
    }

    pub fn pen_down(&mut self) {
        self.pen.down = true;
    }

    pub fn set_pen_size(&mut self, size: f64) {
        self.pen.size = size;
    }

    pub fn set_color(&mut self, color: impl Into<Color>) {
        self.pen.color = color.into();
        self.emit_state();
    }

    pub fn set_color_str(&mut self, color: &str) -> Result<(), Error> {
        self.set_color(color.parse::<Color>()?);
        Ok(())
    }

    /// Sets the drawing speed, clamping it into `0..=MAX_SPEED`.
    pub fn set_speed(&mut self, speed: i64) {
        self.pen.speed = speed.clamp(0, MAX_SPEED as i64) as u8;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.emit_state();
    }

    pub fn show(&mut self) {
        self.visible = true;
        self.emit_state();
    }

    pub fn clear(&mut self) {
        self.screen.push(Cmd::Clear);
        self.emit_state();
    }

    pub fn set_bg_color(&mut self, color: impl Into<Color>) {
        self.screen.push(Cmd::Bg {
            color: color.into(),
        });
        self.emit_state();
    }

    /// Wipes the screen, paints the default background and puts the turtle back in its
    /// initial state. The screen's log and tracer setting survive.
    pub fn reset(&mut self) {
        self.screen.push(Cmd::Clear);
        self.screen.push(Cmd::Bg {
            color: Color::BACKGROUND,
        });
        self.pos = Point::ORIGIN;
        self.heading = 0.0;
        self.pen = Pen::default();
        self.visible = true;
        self.emit_state();
    }

    pub fn tracer(&mut self, n: u32) {
        self.screen.set_tracer(n);
    }

    pub fn update(&mut self) {
        self.screen.update();
    }
}
