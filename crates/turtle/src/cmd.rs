use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::Color;

/// One record on a screen's command log.
///
/// Renderers replay these in order; the serialized form is an object tagged by `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Cmd {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
        width: f64,
        speed: u8,
    },
    /// A snapshot of the turtle, emitted after every change to its state.
    Turtle {
        x: f64,
        y: f64,
        heading: f64,
        visible: bool,
        pencolor: Color,
    },
    Clear,
    Bg { color: Color },
}

impl Cmd {
    pub fn line_endpoints(&self) -> Option<(Point, Point)> {
        match self {
            Cmd::Line { x1, y1, x2, y2, .. } => Some((Point::new(*x1, *y1), Point::new(*x2, *y2))),
            _ => None,
        }
    }
}

/// Where a turtle's commands end up.
///
/// With the tracer on, commands go straight onto the log. With the tracer off
/// (`tracer(0)`) they're held back until `update`, and lines are marked as instant.
#[derive(Clone, Debug)]
pub struct Screen {
    tracer: u32,
    pending: Vec<Cmd>,
    log: Vec<Cmd>,
}

impl Default for Screen {
    fn default() -> Self {
        Screen {
            tracer: 1,
            pending: Vec::new(),
            log: Vec::new(),
        }
    }
}

impl Screen {
    pub fn push(&mut self, mut cmd: Cmd) {
        if self.tracer == 0 {
            if let Cmd::Line { speed, .. } = &mut cmd {
                *speed = 0;
            }
            self.pending.push(cmd);
        } else {
            self.log.push(cmd);
        }
    }

    pub fn tracer(&self) -> u32 {
        self.tracer
    }

    pub fn set_tracer(&mut self, n: u32) {
        self.tracer = n;
        if n != 0 {
            self.update();
        }
    }

    /// Moves any buffered commands onto the log.
    pub fn update(&mut self) {
        if !self.pending.is_empty() {
            log::trace!("flushing {} buffered commands", self.pending.len());
            self.log.append(&mut self.pending);
        }
    }

    /// Commands held back by `tracer(0)` and not yet flushed.
    pub fn pending(&self) -> &[Cmd] {
        &self.pending
    }

    pub fn commands(&self) -> &[Cmd] {
        &self.log
    }

    pub fn into_commands(mut self) -> Vec<Cmd> {
        self.update();
        self.log
    }
}
