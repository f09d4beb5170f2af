use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Instant;

/// Lines shown under the field once all ten targets are down
pub const FLAVOR_LINES: &[&str] = &[
    "crosshair placement: immaculate",
    "your mouse is filing for overtime",
    "ten for ten, not a single one escaped",
    "reflexes of a caffeinated squirrel",
    "the targets never stood a chance",
    "certified flick machine",
    "clean. absolutely clean.",
    "somewhere a pro player just felt a chill",
    "that was faster than your last excuse",
    "aim assist? never heard of her",
];

/// Picks one line uniformly from `pool`, or from the built-in lines when the
/// pool is empty.
pub fn pick_flavor<R: Rng + ?Sized>(rng: &mut R, pool: &[String]) -> String {
    if let Some(line) = pool.choose(rng) {
        return line.clone();
    }
    FLAVOR_LINES
        .choose(rng)
        .copied()
        .unwrap_or("nice shooting")
        .to_string()
}

pub const DEFAULT_PIECES: usize = 200;
const GRAVITY: f64 = 6.0;
const TERMINAL_VELOCITY: f64 = 14.0;
const FRAME_DT: f64 = 0.05;

/// A single piece of confetti, in viewport cell coordinates
#[derive(Debug, Clone)]
pub struct ConfettiPiece {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub phase: f64,
}

impl ConfettiPiece {
    fn new(x: f64, y: f64) -> Self {
        let mut rng = rand::thread_rng();

        Self {
            x,
            y,
            vel_x: rng.gen_range(-2.0..2.0),
            vel_y: rng.gen_range(1.0..5.0),
            symbol: *['▪', '•', '◆', '▴', '*', '~', '▫']
                .choose(&mut rng)
                .unwrap_or(&'•'),
            color_index: rng.gen_range(0..7),
            phase: rng.gen_range(0.0..std::f64::consts::TAU),
        }
    }

    fn update(&mut self, dt: f64) {
        // flutter sideways while falling
        self.phase += dt * 4.0;
        self.x += (self.vel_x + self.phase.sin()) * dt;
        self.y += self.vel_y * dt;
        self.vel_y = (self.vel_y + GRAVITY * dt).min(TERMINAL_VELOCITY);
    }
}

/// One-shot confetti burst covering the whole viewport. Pieces are never
/// recycled: each one falls out of view and is gone.
#[derive(Debug)]
pub struct ConfettiAnimation {
    pub pieces: Vec<ConfettiPiece>,
    pub start_time: Instant,
    pub duration: f64, // seconds
    pub is_active: bool,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub number_of_pieces: usize,
}

impl ConfettiAnimation {
    pub fn new(number_of_pieces: usize) -> Self {
        Self {
            pieces: Vec::new(),
            start_time: Instant::now(),
            duration: 8.0,
            is_active: false,
            viewport_width: 80.0,
            viewport_height: 24.0,
            number_of_pieces,
        }
    }

    pub fn start(&mut self, width: u16, height: u16) {
        let mut rng = rand::thread_rng();

        self.pieces.clear();
        self.start_time = Instant::now();
        self.viewport_width = width as f64;
        self.viewport_height = height as f64;

        if width == 0 || height == 0 || self.number_of_pieces == 0 {
            self.is_active = false;
            return;
        }
        self.is_active = true;

        // start above the top edge so the burst rains in instead of popping up
        for _ in 0..self.number_of_pieces {
            let x = rng.gen_range(0.0..self.viewport_width);
            let y = rng.gen_range(-self.viewport_height..0.0);
            self.pieces.push(ConfettiPiece::new(x, y));
        }
    }

    pub fn stop(&mut self) {
        self.is_active = false;
        self.pieces.clear();
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport_width = width as f64;
        self.viewport_height = height as f64;
    }

    pub fn update(&mut self) {
        if !self.is_active {
            return;
        }

        if self.start_time.elapsed().as_secs_f64() >= self.duration {
            self.stop();
            return;
        }

        let (width, height) = (self.viewport_width, self.viewport_height);
        let buffer = 2.0;
        self.pieces.retain_mut(|piece| {
            piece.update(FRAME_DT);
            piece.y < height + buffer && piece.x > -buffer && piece.x < width + buffer
        });

        if self.pieces.is_empty() {
            self.is_active = false;
        }
    }
}

impl Default for ConfettiAnimation {
    fn default() -> Self {
        Self::new(DEFAULT_PIECES)
    }
}
