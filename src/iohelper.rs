/**
 * Helper functions for input and output.
 */
use colored::*;
use std::io;
use std::io::Write;

use rustyline::error::ReadlineError;

use super::common::{QuizError, Result};

#[macro_export]
macro_rules! my_println {
    ($($arg:tt)*) => (
        writeln!(std::io::stdout(), $($arg)*).map_err(QuizError::Io)
    );
}

#[macro_export]
macro_rules! my_print {
    ($($arg:tt)*) => (
        write!(std::io::stdout(), $($arg)*).map_err(QuizError::Io)
    );
}

/// Display a prompt and read one line from standard input. If the user presses Ctrl+D
/// then `Ok(None)` is returned. If the user pressed Ctrl+C then
/// `Err(QuizError::ReadlineInterrupted)` is returned, and a line that is not valid UTF-8
/// gives `Err(QuizError::InvalidInput)`. Otherwise, `Ok(Some(line))` is returned, where
/// `line` may be blank.
pub fn prompt(editor: &mut rustyline::Editor<()>, message: &str) -> Result<Option<String>> {
    match editor.readline(message) {
        Ok(response) => Ok(Some(response)),
        Err(ReadlineError::Interrupted) => Err(QuizError::ReadlineInterrupted),
        Err(ReadlineError::Eof) => Ok(None),
        Err(ReadlineError::Io(ref err)) if err.kind() == io::ErrorKind::InvalidData => {
            Err(QuizError::InvalidInput)
        },
        #[cfg(unix)]
        Err(ReadlineError::Utf8Error) => Err(QuizError::InvalidInput),
        Err(ReadlineError::Io(err)) => Err(QuizError::Io(err)),
        Err(_) => Ok(None),
    }
}

/// Print `message` to standard output, breaking lines according to the current width
/// of the terminal. Prepend `prefix` to the first line and indent all subsequent lines
/// by its length.
pub fn prettyprint(message: &str, prefix: &str) -> Result<()> {
    prettyprint_colored(message, prefix, None, None)
}

/// Like `prettyprint`, but lines of `message` that already fit are printed unchanged, so
/// that indented code in question prompts keeps its shape.
pub fn prettyprint_colored(
    message: &str,
    prefix: &str,
    message_color: Option<Color>,
    prefix_color: Option<Color>,
) -> Result<()> {
    let width = textwrap::termwidth().saturating_sub(prefix.len()).max(20);
    let indent = " ".repeat(prefix.len());

    if message.lines().next().is_none() {
        return my_println!("{}", color_optional(prefix, prefix_color));
    }

    let mut first = true;
    for source_line in message.lines() {
        let wrapped: Vec<String> = if source_line.len() <= width {
            vec![source_line.to_string()]
        } else {
            textwrap::wrap_iter(source_line, width).map(|l| l.into_owned()).collect()
        };

        for line in wrapped.iter() {
            let colored_line = color_optional(line, message_color);
            if first {
                let colored_prefix = color_optional(prefix, prefix_color);
                my_println!("{}{}", colored_prefix, colored_line)?;
                first = false;
            } else {
                my_println!("{}{}", indent, colored_line)?;
            }
        }
    }
    Ok(())
}

fn color_optional(text: &str, color: Option<Color>) -> ColoredString {
    if let Some(color) = color {
        text.color(color)
    } else {
        text.normal()
    }
}
