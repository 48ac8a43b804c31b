//! Line-oriented console
//!
//! Commands and prompt answers share one input stream, so a whole session
//! (including dialog answers) can be replayed from a file.

use std::io::{BufRead, Write};

use crate::session::prompt::{Prompt, PromptRequest, PromptResponse};

pub struct Console<R, W> {
    input: R,
    pub output: W,
    /// Echo consumed lines back, for non-terminal input
    echo: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, echo: bool) -> Self {
        Self {
            input,
            output,
            echo,
        }
    }

    /// Next input line without its line ending, `None` at end of input
    pub fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim_end_matches(['\r', '\n']).to_string();
        if self.echo {
            writeln!(self.output, "{line}")?;
        }
        Ok(Some(line))
    }

    /// Print without a trailing newline and flush
    pub fn print_prompt(&mut self, text: &str) -> std::io::Result<()> {
        write!(self.output, "{text} ")?;
        self.output.flush()
    }
}

impl<R: BufRead, W: Write> Prompt for Console<R, W> {
    fn request(&mut self, request: &PromptRequest) -> PromptResponse {
        if let Err(err) = self.print_prompt(&request.question()) {
            log::error!("Failed to show prompt: {}", err);
        }
        match self.read_line() {
            Ok(Some(answer)) => PromptResponse::Answer(answer),
            Ok(None) => PromptResponse::Cancelled,
            Err(err) => {
                log::error!("Failed to read prompt answer: {}", err);
                PromptResponse::Cancelled
            }
        }
    }
}
