//! Shared interactive state for the frame loop: speed, pause, color scheme
//! and the help overlay toggle.

pub mod globe;

use crate::help::render_help_overlay;
use crate::terminal::Terminal;
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::style::Color;

pub struct VizState {
    pub speed: f32, // seconds per frame
    pub paused: bool,
    color_scheme: u8,
    show_help: bool,
    help: &'static str,
}

impl VizState {
    pub fn new(initial_speed: f32, help: &'static str) -> Self {
        Self {
            speed: initial_speed,
            paused: false,
            color_scheme: 0,
            show_help: false,
            help,
        }
    }

    pub fn color_scheme(&self) -> u8 {
        self.color_scheme
    }

    pub fn set_color_scheme(&mut self, scheme: u8) {
        self.color_scheme = scheme % 4;
    }

    /// Handle a shared keypress, returns true if the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode, _modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char(' ') => self.paused = !self.paused,
            KeyCode::Char('?') => self.show_help = !self.show_help,
            // Number keys: frame delay (1=fastest .. 9=slowest, 0=crawl)
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let n = c.to_digit(10).unwrap() as u8;
                self.speed = match n {
                    1 => 0.005,
                    2 => 0.01,
                    3 => 0.02,
                    4 => 0.03,
                    5 => 0.05,
                    6 => 0.07,
                    7 => 0.1,
                    8 => 0.15,
                    _ => 0.2,
                };
            }
            // Shift+number symbols switch color schemes
            KeyCode::Char('!') => self.color_scheme = 1,
            KeyCode::Char('@') => self.color_scheme = 2,
            KeyCode::Char('#') => self.color_scheme = 3,
            KeyCode::Char(')') => self.color_scheme = 0,
            _ => {}
        }
        false
    }

    /// Draw the help overlay into the back buffer when toggled on.
    pub fn render_help(&self, term: &mut Terminal, width: u16, height: u16) {
        if self.show_help {
            render_help_overlay(term, width, height, self.help);
        }
    }
}

/// Scheme color by intensity (0 = dimmest). Scheme 0 is the default cyan
/// "grid" look; 1 ember, 2 signal green, 3 mono.
pub fn scheme_color(scheme: u8, intensity: u8, bold: bool) -> (Color, bool) {
    match scheme {
        1 => match intensity {
            0 => (Color::DarkRed, false),
            1 => (Color::Red, false),
            2 => (Color::DarkYellow, bold),
            _ => (Color::Yellow, true),
        },
        2 => match intensity {
            0 => (Color::DarkGreen, false),
            1 => (Color::Green, false),
            2 => (Color::Green, bold),
            _ => (Color::White, true),
        },
        3 => match intensity {
            0 => (Color::DarkGrey, false),
            1 => (Color::Grey, false),
            2 => (Color::White, bold),
            _ => (Color::White, true),
        },
        _ => match intensity {
            0 => (Color::DarkBlue, false),
            1 => (Color::DarkCyan, false),
            2 => (Color::Cyan, bold),
            _ => (Color::White, true),
        },
    }
}
