//! Console player.

use std::io::{self, BufRead, Cursor, Write};

use gobblet4_core::{parse_action, Action, Controller, GameState};

const PROMPT: &str = "Your move (a to (i, j)): ";

/// Source of typed lines.
///
/// `io::Stdin` reads through its own shared buffer, so several humans can
/// take turns on one terminal without holding a lock between moves.
pub trait ReadLine {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

impl ReadLine for io::Stdin {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        io::Stdin::read_line(self, buf)
    }
}

impl<T: AsRef<[u8]>> ReadLine for Cursor<T> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

/// Prompts for moves until one parses and is legal.
pub struct Human<R, W> {
    input: R,
    output: W,
}

impl Human<io::Stdin, io::Stdout> {
    pub fn console() -> Self {
        Self::new(io::stdin(), io::stdout())
    }
}

impl<R: ReadLine, W: Write> Human<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, state: &GameState) -> io::Result<Option<Action>> {
        loop {
            write!(self.output, "\n{}", PROMPT)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match parse_action(state, &line) {
                Ok(action) => return Ok(Some(action)),
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
    }
}

impl<R: ReadLine, W: Write> Controller for Human<R, W> {
    fn pick_action(&mut self, state: &mut GameState) -> Option<Action> {
        match self.ask(state) {
            Ok(action) => action,
            Err(e) => {
                log::warn!("console input failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use gobblet4_core::Pos;

    use super::*;

    #[test]
    fn test_reprompts_until_legal() {
        let input = Cursor::new("hello\nP2-G03-S4 to (0, 0)\nP1-G03-S4 to (9, 0)\np1-g07-s4 to (2, 3)\n");
        let mut output = Vec::new();
        let mut state = GameState::new();

        let action = Human::new(input, &mut output).pick_action(&mut state);
        assert_eq!(action, Some(Action { piece: 7, to: Pos::from_row_col(2, 3) }));

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches(PROMPT).count(), 4);
        assert!(text.contains("belongs to player 2"));
        assert!(text.contains("cell (9, 0) is off the board"));
    }

    #[test]
    fn test_end_of_input_gives_up() {
        let mut output = Vec::new();
        let mut state = GameState::new();

        let action = Human::new(Cursor::new("bad move\n"), &mut output).pick_action(&mut state);
        assert_eq!(action, None);
        assert_eq!(state, GameState::new());
    }
}
