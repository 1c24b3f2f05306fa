use thiserror::Error;

use crate::feature::GeometryKind;
use crate::interaction::{PointerEvent, PointerKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// One toolbar or pointer action for the host shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Draw { kind: GeometryKind, freehand: bool },
    Edit,
    Delete,
    Undo,
    Pointer(PointerEvent),
    Zoom(ZoomDirection),
    Pan { delta_x: f64, delta_y: f64 },
    Export,
    Mode,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("usage: {command} {expected}")]
    Usage {
        command: &'static str,
        expected: &'static str,
    },
    #[error("`{value}` is not a finite number (in `{command}`)")]
    InvalidNumber {
        command: &'static str,
        value: String,
    },
}

pub type CommandResult<T> = std::result::Result<T, CommandError>;

fn usage(command: &'static str, expected: &'static str) -> CommandError {
    CommandError::Usage { command, expected }
}

fn parse_number(command: &'static str, value: &str) -> CommandResult<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| CommandError::InvalidNumber {
            command,
            value: value.to_string(),
        })
}

fn parse_pair(command: &'static str, expected: &'static str, args: &[&str]) -> CommandResult<(f64, f64)> {
    match args {
        [x, y] => Ok((parse_number(command, x)?, parse_number(command, y)?)),
        _ => Err(usage(command, expected)),
    }
}

fn resolve_bare(command: &'static str, args: &[&str], resolved: Command) -> CommandResult<Command> {
    if args.is_empty() {
        Ok(resolved)
    } else {
        Err(usage(command, "(no arguments)"))
    }
}

fn resolve_draw(command: &'static str, kind: GeometryKind, args: &[&str]) -> CommandResult<Command> {
    let freehand = match args {
        [] => false,
        [flag] if flag.eq_ignore_ascii_case("freehand") => true,
        _ => return Err(usage(command, "[freehand]")),
    };
    Ok(Command::Draw { kind, freehand })
}

fn resolve_pointer(command: &'static str, kind: PointerKind, args: &[&str]) -> CommandResult<Command> {
    let (x, y) = parse_pair(command, "X Y", args)?;
    Ok(Command::Pointer(PointerEvent::new(kind, x, y)))
}

fn resolve_zoom(args: &[&str]) -> CommandResult<Command> {
    match args {
        [direction] if direction.eq_ignore_ascii_case("in") => Ok(Command::Zoom(ZoomDirection::In)),
        [direction] if direction.eq_ignore_ascii_case("out") => {
            Ok(Command::Zoom(ZoomDirection::Out))
        }
        _ => Err(usage("zoom", "in|out")),
    }
}

/// Parses one shell line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> CommandResult<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match head.to_ascii_lowercase().as_str() {
        "line" => resolve_draw("line", GeometryKind::LineString, &args)?,
        "polygon" => resolve_draw("polygon", GeometryKind::Polygon, &args)?,
        "point" => resolve_bare(
            "point",
            &args,
            Command::Draw {
                kind: GeometryKind::Point,
                freehand: false,
            },
        )?,
        "edit" => resolve_bare("edit", &args, Command::Edit)?,
        "delete" => resolve_bare("delete", &args, Command::Delete)?,
        "undo" => resolve_bare("undo", &args, Command::Undo)?,
        "click" => resolve_pointer("click", PointerKind::Click, &args)?,
        "dblclick" => resolve_pointer("dblclick", PointerKind::DoubleClick, &args)?,
        "down" => resolve_pointer("down", PointerKind::Down, &args)?,
        "drag" => resolve_pointer("drag", PointerKind::Drag, &args)?,
        "up" => resolve_pointer("up", PointerKind::Up, &args)?,
        "move" => resolve_pointer("move", PointerKind::Move, &args)?,
        "zoom" => resolve_zoom(&args)?,
        "pan" => {
            let (delta_x, delta_y) = parse_pair("pan", "DX DY", &args)?;
            Command::Pan { delta_x, delta_y }
        }
        "export" => resolve_bare("export", &args, Command::Export)?,
        "mode" => resolve_bare("mode", &args, Command::Mode)?,
        "quit" | "exit" => resolve_bare("quit", &args, Command::Quit)?,
        _ => return Err(CommandError::Unknown(head.to_string())),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(line: &str) -> Command {
        parse_command(line)
            .expect("line should parse")
            .expect("line should carry a command")
    }

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("   \t"), Ok(None));
        assert_eq!(parse_command("# draw the roof outline"), Ok(None));
    }

    #[test]
    fn toolbar_commands_resolve_to_modes() {
        assert_eq!(
            parsed("line"),
            Command::Draw {
                kind: GeometryKind::LineString,
                freehand: false
            }
        );
        assert_eq!(
            parsed("Polygon FREEHAND"),
            Command::Draw {
                kind: GeometryKind::Polygon,
                freehand: true
            }
        );
        assert_eq!(
            parsed("point"),
            Command::Draw {
                kind: GeometryKind::Point,
                freehand: false
            }
        );
        assert_eq!(parsed("edit"), Command::Edit);
        assert_eq!(parsed("delete"), Command::Delete);
        assert_eq!(parsed("undo"), Command::Undo);
        assert_eq!(parsed("exit"), Command::Quit);
    }

    #[test]
    fn pointer_commands_carry_screen_position() {
        assert_eq!(
            parsed("dblclick 12.5 -4"),
            Command::Pointer(PointerEvent::new(PointerKind::DoubleClick, 12.5, -4.0))
        );
        assert_eq!(
            parsed("  drag 3 4  "),
            Command::Pointer(PointerEvent::new(PointerKind::Drag, 3.0, 4.0))
        );
    }

    #[test]
    fn view_commands_parse_arguments() {
        assert_eq!(parsed("zoom in"), Command::Zoom(ZoomDirection::In));
        assert_eq!(parsed("zoom OUT"), Command::Zoom(ZoomDirection::Out));
        assert_eq!(
            parsed("pan -10 25"),
            Command::Pan {
                delta_x: -10.0,
                delta_y: 25.0
            }
        );
    }

    #[test]
    fn malformed_commands_report_what_went_wrong() {
        assert_eq!(
            parse_command("scribble"),
            Err(CommandError::Unknown("scribble".to_string()))
        );
        assert_eq!(
            parse_command("click 10"),
            Err(CommandError::Usage {
                command: "click",
                expected: "X Y"
            })
        );
        assert_eq!(
            parse_command("line sideways"),
            Err(CommandError::Usage {
                command: "line",
                expected: "[freehand]"
            })
        );
        assert!(matches!(
            parse_command("move 1 NaN"),
            Err(CommandError::InvalidNumber { command: "move", .. })
        ));
        assert!(matches!(parse_command("undo twice"), Err(CommandError::Usage { .. })));
    }
}
