use std::path::Path;

use kurbo::Point;
use turtle::{render, Cmd, Color, Turtle};

#[derive(Default, Clone)]
pub struct TestCase {
    input: String,
    expected: String,
}

impl TestCase {
    fn parse(&self) {
        let color: Color = self.input.trim().parse().unwrap();
        assert_eq!(color.to_string(), self.expected.trim());
    }

    fn parse_failure(&self) {
        let err = self.input.trim().parse::<Color>().unwrap_err();
        assert_eq!(err.to_string(), self.expected.trim());
    }
}

pub fn read_tests(path: impl AsRef<Path>) -> Vec<TestCase> {
    let text = std::fs::read_to_string(path).unwrap();
    let mut ret = Vec::new();
    let mut in_input = true;
    let mut cur = TestCase::default();

    fn separator_line(line: &str, ch: u8) -> bool {
        line.trim().len() >= 2 && line.trim().bytes().all(|c| c == ch)
    }

    for line in text.split_inclusive('\n') {
        if in_input {
            if separator_line(line, b'-') {
                in_input = false;
            } else {
                cur.input += line;
            }
        } else if separator_line(line, b'=') {
            in_input = true;
            ret.push(std::mem::take(&mut cur));
        } else {
            cur.expected += line;
        }
    }
    ret
}

#[test]
fn color_tests() {
    let tests = read_tests("tests/colors.txt");
    assert!(!tests.is_empty());
    for test in tests {
        test.parse();
    }
}

#[test]
fn color_failures() {
    let tests = read_tests("tests/bad-colors.txt");
    assert!(!tests.is_empty());
    for test in tests {
        test.parse_failure();
    }
}

#[test]
fn json_log_round_trips() {
    let mut t = Turtle::new();
    t.reset();
    t.set_color(Color::rgb(200, 100, 50));
    t.forward(3.0);
    t.right(90.0);

    let cmds = t.into_screen().into_commands();
    let json = render::json(&cmds).unwrap();
    let back: Vec<Cmd> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cmds);
}

#[test]
fn instant_drawing_flushes_on_update() {
    let mut t = Turtle::new();
    t.set_speed(9);
    t.tracer(0);
    t.forward(1.0);
    t.forward(1.0);
    assert!(t
        .screen()
        .commands()
        .iter()
        .all(|c| c.line_endpoints().is_none()));

    t.update();
    t.tracer(1);
    let speeds: Vec<u8> = t
        .screen()
        .commands()
        .iter()
        .filter_map(|c| match c {
            Cmd::Line { speed, .. } => Some(*speed),
            _ => None,
        })
        .collect();
    assert_eq!(speeds, vec![0, 0]);
    assert_eq!(t.position(), Point::new(2.0, 0.0));
}

#[test]
fn svg_file_is_written() {
    let path = std::env::temp_dir().join(format!("turtle-render-{}.svg", std::process::id()));
    let mut t = Turtle::new();
    t.forward(50.0);
    render::save_svg(&path, t.screen().commands(), &render::RenderOptions::default()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert!(text.contains("<svg"));
    assert!(text.contains("<line"));
}
