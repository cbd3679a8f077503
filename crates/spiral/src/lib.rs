use rand::Rng;
use serde::{Deserialize, Serialize};
use turtle::{kurbo::Point, Cmd, Color, Turtle};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpiralConfig {
    /// How many forward-and-turn steps to take.
    pub iterations: u32,
    /// Degrees turned left after each step.
    pub turn: f64,
    /// Length of the first step.
    pub initial_distance: f64,
    /// How much longer each step is than the one before.
    pub growth: f64,
    pub speed: u8,
    pub pen_size: f64,
    /// Draw with the tracer off, restoring it (and flushing) at the end.
    pub instant: bool,
}

impl Default for SpiralConfig {
    fn default() -> SpiralConfig {
        SpiralConfig {
            iterations: 300,
            turn: 10.0,
            initial_distance: 1.0,
            growth: 0.1,
            speed: 9,
            pen_size: 2.0,
            instant: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f64 },
    #[error("initial_distance can't be negative (got {0})")]
    NegativeDistance(f64),
    #[error("growth can't be negative (got {0})")]
    NegativeGrowth(f64),
    #[error("pen_size must be positive (got {0})")]
    BadPenSize(f64),
}

impl SpiralConfig {
    // Step lengths must never shrink, and every number has to be finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("turn", self.turn),
            ("initial_distance", self.initial_distance),
            ("growth", self.growth),
            ("pen_size", self.pen_size),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }
        if self.initial_distance < 0.0 {
            return Err(ConfigError::NegativeDistance(self.initial_distance));
        }
        if self.growth < 0.0 {
            return Err(ConfigError::NegativeGrowth(self.growth));
        }
        if self.pen_size <= 0.0 {
            return Err(ConfigError::BadPenSize(self.pen_size));
        }
        Ok(())
    }
}

/// What happened on one trip around the loop.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub index: u32,
    pub color: Color,
    pub distance: f64,
    pub from: Point,
    pub to: Point,
    /// The heading after turning.
    pub heading: f64,
}

/// Draws the spiral with `turtle`, starting wherever it is and facing wherever it faces.
///
/// The pen settings in `config` are applied first. Returns one [`Step`] per iteration.
pub fn draw<R: Rng + ?Sized>(
    turtle: &mut Turtle,
    config: &SpiralConfig,
    rng: &mut R,
) -> Vec<Step> {
    turtle.set_speed(config.speed.into());
    turtle.set_pen_size(config.pen_size);
    let tracer = turtle.screen().tracer();
    if config.instant {
        turtle.tracer(0);
    }

    let mut steps = Vec::with_capacity(config.iterations as usize);
    let mut dist = config.initial_distance;
    for index in 0..config.iterations {
        let color = Color::random(rng);
        turtle.set_color(color);

        let from = turtle.position();
        turtle.forward(dist);
        turtle.left(config.turn);
        log::trace!("step {index}: {color} for {dist}");

        steps.push(Step {
            index,
            color,
            distance: dist,
            from,
            to: turtle.position(),
            heading: turtle.heading(),
        });
        dist += config.growth;
    }

    if config.instant {
        turtle.tracer(tracer);
    }
    steps
}

/// A finished spiral.
#[derive(Clone, Debug)]
pub struct Drawing {
    pub steps: Vec<Step>,
    pub commands: Vec<Cmd>,
}

impl Drawing {
    /// The distance the next step would have covered.
    pub fn final_distance(&self, config: &SpiralConfig) -> f64 {
        self.steps
            .last()
            .map(|s| s.distance + config.growth)
            .unwrap_or(config.initial_distance)
    }
}

/// Draws a spiral on a fresh screen.
pub fn run<R: Rng + ?Sized>(config: &SpiralConfig, rng: &mut R) -> Result<Drawing, ConfigError> {
    config.validate()?;

    let mut turtle = Turtle::new();
    turtle.reset();
    let steps = draw(&mut turtle, config, rng);
    log::info!(
        "drew {} steps, ending at {:?} facing {}",
        steps.len(),
        turtle.position(),
        turtle.heading()
    );

    Ok(Drawing {
        steps,
        commands: turtle.into_screen().into_commands(),
    })
}
