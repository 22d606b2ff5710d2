use std::io::{self, Stdout, Write};

use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::queue;
use crossterm::terminal::{self, Clear, ClearType};
use little_chat_core::{DisplaySink, Role};
use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthChar;

const BAR_CHAR: &str = "▎";
const FALLBACK_COLUMNS: usize = 80;
const FALLBACK_ROWS: usize = 24;

/// A [`DisplaySink`] that draws the chat in a plain terminal.
///
/// Fixed blocks are printed and scroll away. The live region sits below
/// them and is redrawn in place: the cursor moves back over the rows drawn
/// last time and clears everything below before printing again.
///
/// Rows that have scrolled off the screen cannot be reached any more. Once
/// the live region is taller than the screen, only its visible tail is
/// redrawn and the rows above are left as they are.
pub struct TerminalSink<W: Write = Stdout> {
    out: W,
    columns: Option<usize>,
    rows: Option<usize>,
    live_rows: usize,
}

impl TerminalSink<Stdout> {
    /// Creates a sink drawing to the standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSink<W> {
    /// Creates a sink drawing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            columns: None,
            rows: None,
            live_rows: 0,
        }
    }

    /// Pins the terminal width instead of asking the terminal.
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Pins the terminal height instead of asking the terminal.
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Prints the banner shown above the conversation.
    pub fn print_title(&mut self, title: &str) {
        self.settle(|this| {
            writeln!(this.out, "{}\n", title.bold())?;
            Ok(())
        });
    }

    /// Prints the input prompt, leaving the cursor after it.
    pub fn print_prompt(&mut self, hint: &str) {
        self.settle(|this| {
            write!(this.out, "{} ", prompt_text(hint).dimmed())?;
            Ok(())
        });
    }

    /// Removes the prompt printed with `hint` and the `input` typed after
    /// it, so that the input only shows up once, as a chat block.
    pub fn erase_input_line(&mut self, hint: &str, input: &str) {
        let typed = format!("{} {input}", prompt_text(hint));
        let rows = rows_for(&typed, self.columns()).min(self.rows());
        self.settle(|this| {
            queue!(this.out, MoveUp(to_u16(rows)), MoveToColumn(0))?;
            queue!(this.out, Clear(ClearType::FromCursorDown))?;
            Ok(())
        });
    }

    /// Prints an error below the conversation.
    pub fn print_error(&mut self, message: &str) {
        self.settle(|this| {
            writeln!(this.out, "{}{}", BAR_CHAR.bright_red(), message.red())?;
            Ok(())
        });
    }

    /// Ends the live region, so that further output starts below it.
    pub fn commit_live(&mut self) {
        self.settle(|_| Ok(()));
    }

    /// Returns the writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Closes the live region, then runs `f` and flushes.
    fn settle(&mut self, f: impl FnOnce(&mut Self) -> io::Result<()>) {
        if let Err(err) = self.try_settle(f) {
            warn!("failed to write to the terminal: {err}");
        }
    }

    fn try_settle(
        &mut self,
        f: impl FnOnce(&mut Self) -> io::Result<()>,
    ) -> io::Result<()> {
        if self.live_rows > 0 {
            writeln!(self.out)?;
            self.live_rows = 0;
        }
        f(self)?;
        self.out.flush()
    }

    fn columns(&self) -> usize {
        self.columns
            .or_else(|| terminal::size().ok().map(|(cols, _)| cols as usize))
            .filter(|cols| *cols > 0)
            .unwrap_or(FALLBACK_COLUMNS)
    }

    fn rows(&self) -> usize {
        self.rows
            .or_else(|| terminal::size().ok().map(|(_, rows)| rows as usize))
            .filter(|rows| *rows > 0)
            .unwrap_or(FALLBACK_ROWS)
    }

    fn draw_live(&mut self, content: &str) -> io::Result<()> {
        // Rows of the previous draw that scrolled off; they stay untouched.
        let mut skipped = 0;
        if self.live_rows > 0 {
            let visible = self.live_rows.min(self.rows());
            skipped = self.live_rows - visible;
            queue!(self.out, MoveToColumn(0))?;
            if visible > 1 {
                queue!(self.out, MoveUp(to_u16(visible - 1)))?;
            }
            queue!(self.out, Clear(ClearType::FromCursorDown))?;
        }

        let prefix = role_prefix(Role::Assistant);
        let text = format!("{BAR_CHAR}{prefix}{content}");
        let starts = row_starts(&text, self.columns());
        if skipped == 0 {
            write!(
                self.out,
                "{}{prefix}{content}",
                BAR_CHAR.bright_cyan(),
            )?;
        } else if let Some(&start) = starts.get(skipped) {
            write!(self.out, "{}", &text[start..])?;
        }
        self.live_rows = starts.len();
        self.out.flush()
    }
}

impl<W: Write> DisplaySink for TerminalSink<W> {
    fn render_fixed(&mut self, role: Role, content: &str) {
        self.settle(|this| {
            let bar = match role {
                Role::User => BAR_CHAR.bright_green().to_string(),
                Role::Assistant => BAR_CHAR.bright_cyan().to_string(),
            };
            writeln!(this.out, "{bar}{}{}", role_prefix(role), content)?;
            Ok(())
        });
    }

    fn render_live(&mut self, content: &str) {
        if let Err(err) = self.draw_live(content) {
            warn!("failed to draw the live region: {err}");
        }
    }
}

#[inline]
fn role_prefix(role: Role) -> &'static str {
    match role {
        Role::User => "🧑 ",
        Role::Assistant => "🤖 ",
    }
}

#[inline]
fn prompt_text(hint: &str) -> String {
    format!("{hint} ›")
}

#[inline]
fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Counts the terminal rows `text` takes up when wrapped at `columns`.
fn rows_for(text: &str, columns: usize) -> usize {
    row_starts(text, columns).len()
}

/// Returns the byte offset at which each terminal row of `text` starts
/// when wrapped at `columns`. A character too wide for what is left of a
/// row moves to the next one.
fn row_starts(text: &str, columns: usize) -> Vec<usize> {
    let columns = columns.max(1);
    let mut starts = vec![0];
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            starts.push(idx + 1);
            used = 0;
            continue;
        }
        let width = ch.width().unwrap_or(0);
        if used + width > columns && used > 0 {
            starts.push(idx);
            used = 0;
        }
        used += width;
    }
    starts
}
