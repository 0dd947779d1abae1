use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

use crate::machine::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};

// canvas coordinate ranges; y is negated so framebuffer row 0 renders at
// the top of the box
const X_BOUNDS: [f64; 2] = [0.0, (SCREEN_WIDTH - 1) as f64];
const Y_BOUNDS: [f64; 2] = [-((SCREEN_HEIGHT - 1) as f64), 0.0];

/// lit framebuffer cells as canvas points
fn lit_points(framebuffer: &FrameBuffer) -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    for (y, row) in framebuffer.iter().enumerate() {
        for (x, &lit) in row.iter().enumerate() {
            if lit {
                points.push((x as f64, -(y as f64)));
            }
        }
    }
    points
}

/// Renders framebuffer snapshots 1:1 inside a bordered box, one terminal
/// cell per pixel. Owns the terminal for its whole lifetime: construction
/// enters raw mode and the alternate screen and hides the cursor, dropping
/// restores all three.
pub struct TermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TermDisplay {
    pub fn new() -> Result<TermDisplay, io::Error> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(TermDisplay { terminal })
    }

    pub fn draw(&mut self, framebuffer: &FrameBuffer) -> Result<(), io::Error> {
        self.terminal.draw(|f| {
            // 1:1 between pixels and cells, plus the border
            let size = Rect::new(0, 0, 2 + SCREEN_WIDTH as u16, 2 + SCREEN_HEIGHT as u16);
            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(X_BOUNDS)
                .y_bounds(Y_BOUNDS)
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &lit_points(framebuffer),
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

impl Drop for TermDisplay {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
}
