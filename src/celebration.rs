use rand::seq::SliceRandom;
use rand::Rng;
use std::time::{Duration, Instant};

const CONFETTI: [char; 6] = ['*', '+', 'o', '.', '~', '#'];
const BANNERS: [&str; 4] = ["SOLVED!", "NAILED IT!", "GENIUS!", "SPLENDID!"];
const GRAVITY: f64 = 9.0;

/// A single falling scrap of confetti, or one letter of the banner
#[derive(Debug, Clone)]
pub struct Piece {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    /// Banner letters hang in place instead of falling
    pub pinned: bool,
}

impl Piece {
    fn confetti(x: f64, rng: &mut impl Rng) -> Self {
        Self {
            x,
            y: rng.gen_range(-6.0..0.0),
            vel_x: rng.gen_range(-2.0..2.0),
            vel_y: rng.gen_range(0.5..3.0),
            symbol: *CONFETTI.choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..6),
            pinned: false,
        }
    }

    fn banner_letter(x: f64, y: f64, symbol: char, color_index: usize) -> Self {
        Self {
            x,
            y,
            vel_x: 0.0,
            vel_y: 0.0,
            symbol,
            color_index,
            pinned: true,
        }
    }

    fn advance(&mut self, dt: f64) {
        if self.pinned {
            return;
        }
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
    }
}

/// Confetti shower played over the board after a win
#[derive(Debug)]
pub struct Celebration {
    pub pieces: Vec<Piece>,
    started_at: Option<Instant>,
    last_update: Option<Instant>,
    duration: Duration,
    width: f64,
    height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self {
            pieces: Vec::new(),
            started_at: None,
            last_update: None,
            duration: Duration::from_secs(3),
            width: 80.0,
            height: 24.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn start(&mut self, width: u16, height: u16, now: Instant) {
        let mut rng = rand::thread_rng();
        self.pieces.clear();
        self.started_at = Some(now);
        self.last_update = Some(now);
        self.width = f64::from(width.max(1));
        self.height = f64::from(height.max(1));

        let banner = BANNERS.choose(&mut rng).unwrap_or(&"SOLVED!");
        let left = (self.width - banner.len() as f64) / 2.0;
        let row = (self.height / 3.0).floor();
        for (i, ch) in banner.chars().enumerate().filter(|(_, c)| *c != ' ') {
            self.pieces.push(Piece::banner_letter(
                left + i as f64,
                row,
                ch,
                rng.gen_range(0..6),
            ));
        }

        let count = (self.width as usize).clamp(10, 60);
        for _ in 0..count {
            let x = rng.gen_range(0.0..self.width);
            self.pieces.push(Piece::confetti(x, &mut rng));
        }
    }

    pub fn stop(&mut self) {
        self.started_at = None;
        self.last_update = None;
        self.pieces.clear();
    }

    /// Moves every piece by the real time since the previous update, ending
    /// the show once its time is up
    pub fn update(&mut self, now: Instant) {
        let Some(started_at) = self.started_at else {
            return;
        };
        if now.saturating_duration_since(started_at) >= self.duration {
            self.stop();
            return;
        }

        let last = self.last_update.unwrap_or(started_at);
        let dt = now.saturating_duration_since(last).as_secs_f64();
        self.last_update = Some(now.max(last));

        let (width, height) = (self.width, self.height);
        self.pieces.retain_mut(|piece| {
            piece.advance(dt);
            piece.pinned || (piece.y < height && piece.x >= 0.0 && piece.x < width)
        });
    }
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}
