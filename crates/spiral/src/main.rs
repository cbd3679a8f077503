use std::path::{Path, PathBuf};
use std::process::exit;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rand::{rngs::StdRng, SeedableRng};
use spiral::SpiralConfig;
use turtle::render::{self, RenderOptions};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Svg,
    Json,
}

#[derive(Parser, Debug)]
struct Args {
    /// Where to write the drawing.
    #[arg(default_value = "spiral.svg")]
    output: PathBuf,
    /// Output format. Guessed from the output's extension if not given.
    #[arg(long, value_enum)]
    format: Option<Format>,
    /// A json file with spiral settings. Anything missing takes its default.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    iterations: Option<u32>,
    #[arg(long, allow_hyphen_values = true)]
    turn: Option<f64>,
    #[arg(long)]
    initial_distance: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    growth: Option<f64>,
    #[arg(long)]
    speed: Option<u8>,
    #[arg(long)]
    pen_size: Option<f64>,
    /// Draw with the tracer off.
    #[arg(long)]
    instant: bool,
    /// Seed for the colors. Without one, every run is different.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 10.0)]
    margin: f64,
}

impl Args {
    fn format(&self) -> Format {
        self.format.unwrap_or_else(|| {
            match self.output.extension().and_then(|e| e.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
                _ => Format::Svg,
            }
        })
    }

    fn spiral_config(&self) -> anyhow::Result<SpiralConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SpiralConfig::default(),
        };
        if let Some(x) = self.iterations {
            config.iterations = x;
        }
        if let Some(x) = self.turn {
            config.turn = x;
        }
        if let Some(x) = self.initial_distance {
            config.initial_distance = x;
        }
        if let Some(x) = self.growth {
            config.growth = x;
        }
        if let Some(x) = self.speed {
            config.speed = x;
        }
        if let Some(x) = self.pen_size {
            config.pen_size = x;
        }
        config.instant |= self.instant;
        Ok(config)
    }
}

fn load_config(path: &Path) -> anyhow::Result<SpiralConfig> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("bad config in {}", path.display()))
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = args.spiral_config()?;
    log::debug!("{config:?}");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let drawing = spiral::run(&config, &mut rng)?;

    let format = args.format();
    let written = match format {
        Format::Svg => {
            let opts = RenderOptions {
                margin: args.margin,
                ..RenderOptions::default()
            };
            render::save_svg(&args.output, &drawing.commands, &opts)
        }
        Format::Json => render::save_json(&args.output, &drawing.commands),
    };
    written.with_context(|| format!("failed to write {}", args.output.display()))?;

    log::info!(
        "wrote {} ({format:?}, {} commands)",
        args.output.display(),
        drawing.commands.len()
    );
    Ok(())
}

pub fn main() {
    pretty_env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        log::error!("{e:#}");
        exit(1);
    }
}

#[cfg(test)]
mod tests {
    use turtle::Cmd;

    use super::*;

    #[test]
    fn format_from_extension() {
        let args = Args::parse_from(["spiral", "out.JSON"]);
        assert_eq!(args.format(), Format::Json);
        let args = Args::parse_from(["spiral", "out.json", "--format", "svg"]);
        assert_eq!(args.format(), Format::Svg);
        let args = Args::parse_from(["spiral"]);
        assert_eq!(args.format(), Format::Svg);
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "spiral",
            "--iterations",
            "20",
            "--turn",
            "-15",
            "--instant",
        ]);
        let config = args.spiral_config().unwrap();
        assert_eq!(config.iterations, 20);
        assert_eq!(config.turn, -15.0);
        assert!(config.instant);
        assert_eq!(config.growth, 0.1);
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("spiral-{}-{name}", std::process::id()))
    }

    fn arg(path: &Path) -> String {
        path.display().to_string()
    }

    #[test]
    fn config_file_with_flags_on_top() {
        let config = scratch_path("layered.json");
        let output = scratch_path("layered-out.json");
        std::fs::write(&config, r#"{"iterations": 40, "turn": 90.0}"#).unwrap();

        let args = Args::parse_from([
            "spiral".to_owned(),
            "--config".to_owned(),
            arg(&config),
            "--iterations".to_owned(),
            "5".to_owned(),
            "--seed".to_owned(),
            "1".to_owned(),
            arg(&output),
        ]);
        let result = run(&args);
        let text = std::fs::read_to_string(&output);
        std::fs::remove_file(&config).unwrap();
        let _ = std::fs::remove_file(&output);
        result.unwrap();

        let cmds: Vec<Cmd> = serde_json::from_str(&text.unwrap()).unwrap();
        let lines = cmds
            .iter()
            .filter(|c| matches!(c, Cmd::Line { .. }))
            .count();
        assert_eq!(lines, 5);

        // The turn came from the file: five quarter turns end up facing north.
        let Some(Cmd::Turtle { heading, .. }) = cmds.last() else {
            panic!("log should end with a turtle snapshot");
        };
        assert!((heading - 90.0).abs() < 1e-9);
    }

    #[test]
    fn writes_svg() {
        let output = scratch_path("out.svg");
        let args = Args::parse_from([
            "spiral".to_owned(),
            "--iterations".to_owned(),
            "12".to_owned(),
            "--seed".to_owned(),
            "3".to_owned(),
            arg(&output),
        ]);
        let result = run(&args);
        let text = std::fs::read_to_string(&output);
        let _ = std::fs::remove_file(&output);
        result.unwrap();

        let text = text.unwrap();
        assert!(text.contains("<svg"));
        assert_eq!(text.matches("<line").count(), 12);
    }

    #[test]
    fn missing_config_is_an_error() {
        let output = scratch_path("never-written.svg");
        let args = Args::parse_from([
            "spiral".to_owned(),
            "--config".to_owned(),
            arg(&scratch_path("no-such-config.json")),
            arg(&output),
        ]);
        let err = run(&args).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config"));
        assert!(!output.exists());
    }

    #[test]
    fn invalid_settings_are_an_error() {
        let output = scratch_path("bad-growth.svg");
        let args = Args::parse_from([
            "spiral".to_owned(),
            "--growth".to_owned(),
            "-1".to_owned(),
            arg(&output),
        ]);
        let err = run(&args).unwrap_err();
        assert!(format!("{err:#}").contains("growth can't be negative"));
        assert!(!output.exists());
    }

    #[test]
    fn clap_config_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
