//! Text commands for the line-oriented driver

use std::path::PathBuf;

use crate::session::messages::Msg;

/// What a line of input asks for
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Msg(Msg),
    Help,
    Quit,
    /// Blank line or comment
    Nothing,
}

pub const HELP: &str = "\
Commands:
  start          Start Drawing
  click X Y      pointer down (adds a point while drawing, selects otherwise)
  move X Y       pointer move (preview edge while drawing)
  create         Create Polygon
  undo           Undo last point
  clear          Clear Canvas
  delete         Delete Selected Polygon
  save [PATH]    Save as PNG
  list           list polygons
  help           this text
  quit           exit";

/// Parse one input line
///
/// Unknown commands and malformed coordinates are reported as `Err` with a
/// message for the user.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(Command::Nothing);
    }

    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Command::Nothing);
    };
    let rest: Vec<&str> = words.collect();

    let cmd = match head.to_ascii_lowercase().as_str() {
        "start" => Command::Msg(Msg::start_drawing()),
        "create" => Command::Msg(Msg::create_polygon()),
        "clear" => Command::Msg(Msg::clear_canvas()),
        "undo" => Command::Msg(Msg::undo()),
        "delete" => Command::Msg(Msg::delete_selected()),
        "save" => {
            // Paths may contain spaces
            let path = (!rest.is_empty()).then(|| PathBuf::from(rest.join(" ")));
            return Ok(Command::Msg(Msg::save_as_png(path)));
        }
        "click" | "down" => {
            let (x, y) = parse_xy(head, &rest)?;
            return Ok(Command::Msg(Msg::pointer_down(x, y)));
        }
        "move" => {
            let (x, y) = parse_xy(head, &rest)?;
            return Ok(Command::Msg(Msg::pointer_move(x, y)));
        }
        "list" | "ls" => Command::Msg(Msg::List),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command '{other}'. Type 'help'.")),
    };

    if !rest.is_empty() {
        return Err(format!("'{head}' takes no arguments"));
    }
    Ok(cmd)
}

fn parse_xy(head: &str, args: &[&str]) -> Result<(f64, f64), String> {
    let usage = || format!("Usage: {head} X Y");
    let [x, y] = args else {
        return Err(usage());
    };
    let x: f64 = x.parse().map_err(|_| usage())?;
    let y: f64 = y.parse().map_err(|_| usage())?;
    if !x.is_finite() || !y.is_finite() {
        return Err(usage());
    }
    Ok((x, y))
}
