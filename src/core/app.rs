use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::annotations::{Notice, handle_msg};
use crate::config::PolymarkConfig;
use crate::core::cli::Cli;
use crate::core::console::Console;
use crate::session::commands::{self, Command, HELP};
use crate::session::messages::{Msg, ToolbarMsg};
use crate::session::prompt::Prompt;
use crate::session::state::AnnotationState;

pub(crate) fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = PolymarkConfig::load(cli.config.as_deref());
    cli.apply(&mut config);
    if cli.save_config {
        let path = config.save(cli.config.as_deref())?;
        log::info!("Saved config to {}", path.display());
    }

    let mut app = App::new(config, cli.output.clone());
    let stdout = io::stdout().lock();
    match &cli.script {
        Some(script) => {
            let file = File::open(script)
                .with_context(|| format!("Failed to open script {}", script.display()))?;
            app.run(&mut Console::new(BufReader::new(file), stdout, true))
        }
        None => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            app.run(&mut Console::new(stdin.lock(), stdout, !interactive))
        }
    }
}

pub struct App {
    pub state: AnnotationState,
    pub config: PolymarkConfig,
    /// Overrides the configured save location
    pub output_dir: Option<PathBuf>,
}

impl App {
    pub fn new(config: PolymarkConfig, output_dir: Option<PathBuf>) -> Self {
        Self {
            state: AnnotationState::new(config.units.clone()),
            config,
            output_dir,
        }
    }

    /// Handle one message
    pub fn update(&mut self, prompt: &mut dyn Prompt, msg: Msg) -> anyhow::Result<Notice> {
        let msg = match msg {
            Msg::Toolbar(ToolbarMsg::SaveAsPng(None)) => Msg::save_as_png(
                self.output_dir
                    .as_ref()
                    .map(|dir| dir.join(&self.config.export_file_name)),
            ),
            msg => msg,
        };
        handle_msg(&mut self.state, &self.config, prompt, msg)
    }

    /// Read commands until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> anyhow::Result<()> {
        writeln!(console.output, "Type 'help' for commands.")?;
        loop {
            console.print_prompt(">")?;
            let Some(line) = console.read_line().context("Failed to read input")? else {
                writeln!(console.output)?;
                break;
            };
            let command = match commands::parse_command(&line) {
                Ok(command) => command,
                Err(message) => {
                    writeln!(console.output, "{message}")?;
                    continue;
                }
            };
            match command {
                Command::Msg(msg) => match self.update(console, msg) {
                    Ok(notice) => print_notice(&mut console.output, &notice)?,
                    Err(err) => {
                        log::error!("{:?}", err);
                        writeln!(console.output, "Error: {err:#}")?;
                    }
                },
                Command::Help => writeln!(console.output, "{HELP}")?,
                Command::Quit => break,
                Command::Nothing => {}
            }
        }
        Ok(())
    }
}

fn print_notice(out: &mut impl Write, notice: &Notice) -> io::Result<()> {
    match notice {
        Notice::None => Ok(()),
        Notice::Info(text) => writeln!(out, "{text}"),
        Notice::Warning(warning) => writeln!(out, "Warning: {warning}"),
        Notice::Listing(lines) if lines.is_empty() => writeln!(out, "No polygons."),
        Notice::Listing(lines) => lines.iter().try_for_each(|line| writeln!(out, "{line}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_script(app: &mut App, script: &str) -> String {
        let mut console = Console::new(Cursor::new(script.to_string()), Vec::new(), false);
        app.run(&mut console).unwrap();
        String::from_utf8(console.output).unwrap()
    }

    fn small_config() -> PolymarkConfig {
        PolymarkConfig {
            canvas_width: 120,
            canvas_height: 90,
            ..PolymarkConfig::default()
        }
    }

    #[test]
    fn test_scripted_session_with_prompt_answers() {
        let mut app = App::new(small_config(), None);
        let out = run_script(
            &mut app,
            "# square with typed sides\n\
             start\n\
             click 10 10\n\
             move 30 11\n\
             click 30 10\n\
             20\n\
             click 30 30\n\
             20\n\
             click 10 30\n\
             \n\
             create\n\
             Room\n\
             list\n",
        );

        assert!(out.contains("Enter the length of the side (ft):"), "{out}");
        assert!(out.contains("Enter a name for the polygon:"), "{out}");
        assert!(out.contains("Created Room (400.00 sq ft)"), "{out}");
        assert!(out.contains("#1 Room: 400.00 sq ft"), "{out}");
        assert_eq!(app.state.polygons.len(), 1);
        assert!(!app.state.is_drawing());
    }

    #[test]
    fn test_warnings_and_unknown_commands_keep_running() {
        let mut app = App::new(small_config(), None);
        let out = run_script(
            &mut app,
            "start\nclick 1 1\nclick 5 5\nabc\ncreate\nfly\nclick 1\nlist\nquit\nstart\n",
        );
        assert!(out.contains("Warning: Invalid length \"abc\""), "{out}");
        assert!(out.contains("Warning: A polygon requires at least 3 points (have 2)."));
        assert!(out.contains("Unknown command 'fly'"));
        assert!(out.contains("Usage: click X Y"));
        assert!(out.contains("No polygons."));
        // Nothing after quit is processed
        assert_eq!(app.state.points().len(), 2);
    }

    #[test]
    fn test_end_of_input_cancels_name_prompt() {
        let mut app = App::new(small_config(), None);
        run_script(&mut app, "start\nclick 0 0\nclick 9 0\n\nclick 0 9\n\ncreate\n");
        let polygon = app.state.polygons.values().next().unwrap();
        assert_eq!(polygon.name, None);
        assert_eq!(polygon.label.text, "Area: 40.50 sq ft");
    }

    #[test]
    fn test_save_goes_to_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(small_config(), Some(dir.path().to_path_buf()));
        let out = run_script(&mut app, "save\n");
        let expected = dir.path().join("canvas.png");
        assert!(expected.exists());
        assert!(out.contains(&format!("Saved {}", expected.display())));
    }

    #[test]
    fn test_explicit_save_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(small_config(), Some(dir.path().join("unused")));
        let target = dir.path().join("plans").join("floor.png");
        run_script(&mut app, &format!("save {}\n", target.display()));
        assert!(target.exists());
        assert!(!dir.path().join("unused").exists());
    }

    #[test]
    fn test_export_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = PolymarkConfig {
            canvas_width: 0,
            ..small_config()
        };
        let mut app = App::new(config, Some(dir.path().to_path_buf()));
        let out = run_script(&mut app, "save\nlist\n");
        assert!(out.contains("Error: Invalid canvas size 0x90"), "{out}");
        assert!(out.contains("No polygons."));
    }
}
