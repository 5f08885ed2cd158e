//! Masked password entry for `user create`.

use std::{error::Error, io::Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal,
};

type PromptResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

const ATTEMPTS: usize = 3;

/// What the terminal should show after a key press.
#[derive(Debug, PartialEq, Eq)]
enum Echo {
    Nothing,
    Mask,
    Erase,
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Typing(Echo),
    Submitted,
    Cancelled,
}

/// Line buffer fed with key events; the typed text is never echoed.
#[derive(Default)]
struct MaskedLine {
    text: String,
}

impl MaskedLine {
    fn press(&mut self, key: KeyEvent) -> Step {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => Step::Submitted,
            KeyCode::Esc => Step::Cancelled,
            KeyCode::Char('c' | 'd') if ctrl => Step::Cancelled,
            KeyCode::Backspace if self.text.pop().is_some() => Step::Typing(Echo::Erase),
            KeyCode::Char(ch) if !ctrl => {
                self.text.push(ch);
                Step::Typing(Echo::Mask)
            }
            _ => Step::Typing(Echo::Nothing),
        }
    }
}

/// Leaves raw mode when dropped, also on early returns.
struct RawMode;

impl RawMode {
    fn enable() -> PromptResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn read_masked(label: &str) -> PromptResult<String> {
    let _raw = RawMode::enable()?;
    let mut err = std::io::stderr();
    execute!(err, Print(label))?;

    let mut line = MaskedLine::default();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match line.press(key) {
            Step::Typing(Echo::Nothing) => {}
            Step::Typing(Echo::Mask) => execute!(err, Print("*"))?,
            Step::Typing(Echo::Erase) => {
                execute!(err, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?
            }
            Step::Submitted => {
                execute!(err, Print("\r\n"))?;
                return Ok(line.text);
            }
            Step::Cancelled => {
                execute!(err, Print("\r\n"))?;
                return Err("password entry cancelled".into());
            }
        }
        err.flush()?;
    }
}

/// Ask for the new password of `email` and its confirmation.
pub fn new_password(email: &str) -> PromptResult<String> {
    for _ in 0..ATTEMPTS {
        let password = read_masked(&format!("Password for {email}: "))?;
        if password.is_empty() {
            eprintln!("password must not be empty");
            continue;
        }
        if read_masked("Repeat password: ")? == password {
            return Ok(password);
        }
        eprintln!("passwords differ, try again");
    }

    Err(format!("no password set after {ATTEMPTS} attempts").into())
}
