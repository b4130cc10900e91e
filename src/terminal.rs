//! Terminal display and input handling

use crate::frame::Frame;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, stdout, BufWriter, Stdout, Write};

/// Queue a cursor move and glyph for every changed cell.
///
/// Cells are addressed 1-based on the wire (`ESC[row;colH`), which is what
/// crossterm's 0-based `MoveTo` emits. Returns how many cells were written.
pub fn write_changes<W: Write>(out: &mut W, frame: &Frame) -> io::Result<usize> {
    let mut written = 0;
    for (row, col, glyph) in frame.changes() {
        queue!(out, cursor::MoveTo(col as u16, row as u16), Print(glyph))?;
        written += 1;
    }
    Ok(written)
}

/// Raw-mode terminal with buffered output
pub struct TerminalDisplay {
    buffer: BufWriter<Stdout>,
}

impl TerminalDisplay {
    pub fn new() -> io::Result<Self> {
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        terminal::enable_raw_mode()?;

        let mut display = Self {
            buffer: BufWriter::new(stdout),
        };
        display.clear()?;
        Ok(display)
    }

    /// Clear the screen and home the cursor
    pub fn clear(&mut self) -> io::Result<()> {
        queue!(
            self.buffer,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        self.buffer.flush()
    }

    /// Show a prompt, wait for any key, then wipe it
    pub fn wait_for_start(&mut self, prompt: &str) -> io::Result<Action> {
        queue!(self.buffer, cursor::MoveTo(0, 0), Print(prompt))?;
        self.buffer.flush()?;
        let action = parse_key_event(self.read_key()?);
        self.clear()?;
        Ok(action)
    }

    /// Block until a key is pressed
    pub fn read_key(&self) -> io::Result<KeyEvent> {
        loop {
            if let Event::Key(key_event) = event::read()? {
                // release/repeat events would move the camera twice
                if key_event.kind == KeyEventKind::Press {
                    return Ok(key_event);
                }
            }
        }
    }

    /// Draw the cells the last render flagged
    pub fn draw(&mut self, frame: &Frame) -> io::Result<usize> {
        let written = write_changes(&mut self.buffer, frame)?;
        self.buffer.flush()?;
        Ok(written)
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = self.buffer.flush();
        let _ = execute!(stdout(), cursor::Show, LeaveAlternateScreen);
    }
}

/// Key actions for the raytracer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
}

/// Parse keyboard input into actions
pub fn parse_key_event(event: KeyEvent) -> Action {
    match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('w') => Action::Forward,
        KeyCode::Char('s') => Action::Back,
        KeyCode::Char('a') => Action::Left,
        KeyCode::Char('d') => Action::Right,
        KeyCode::Char('y') => Action::Up,
        KeyCode::Char('x') => Action::Down,
        _ => Action::None,
    }
}
