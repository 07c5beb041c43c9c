use crate::config::{Mode, UpperBound};
use rand::Rng;

/// The conversion asked for in a single round.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    /// `0x1f` shown, `31` expected
    HexToDecimal,
    /// `31` shown, `1f` expected
    DecimalToHex,
}

impl Direction {
    /// Fixed modes map to one direction; mixed mode flips a coin every call.
    pub fn resolve<R: Rng + ?Sized>(mode: Mode, rng: &mut R) -> Self {
        match mode {
            Mode::HexToDecimal => Direction::HexToDecimal,
            Mode::DecimalToHex => Direction::DecimalToHex,
            Mode::Mixed => {
                if rng.gen_bool(0.5) {
                    Direction::HexToDecimal
                } else {
                    Direction::DecimalToHex
                }
            }
        }
    }

    /// Renders `n` in the representation shown to the player.
    pub fn render(self, n: u32) -> String {
        match self {
            Direction::HexToDecimal => render_hex(n as i64),
            Direction::DecimalToHex => n.to_string(),
        }
    }

    /// Converts a raw answer back into the shown representation.
    ///
    /// Unparseable answers count as zero.
    pub fn reformat_answer(self, raw: &str) -> String {
        match self {
            Direction::HexToDecimal => render_hex(raw.parse::<i64>().unwrap_or(0)),
            Direction::DecimalToHex => parse_hex_digits(raw).unwrap_or(0).to_string(),
        }
    }
}

fn render_hex(value: i64) -> String {
    if value < 0 {
        format!("-0x{:x}", value.unsigned_abs())
    } else {
        format!("0x{:x}", value)
    }
}

// The answer is read as if typed after a `0x` prefix, so signs are not allowed.
fn parse_hex_digits(raw: &str) -> Option<i64> {
    if raw.starts_with(['+', '-']) {
        return None;
    }
    i64::from_str_radix(raw, 16).ok()
}

/// Draws a number uniformly from `[0, bound)`.
pub fn draw_number<R: Rng + ?Sized>(bound: UpperBound, rng: &mut R) -> u32 {
    rng.gen_range(0..bound.get())
}

/// One generate-display-prompt-compare cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub number: u32,
    pub direction: Direction,
    pub display: String,
}

impl Round {
    pub fn new(number: u32, direction: Direction) -> Self {
        Self {
            number,
            direction,
            display: direction.render(number),
        }
    }

    pub fn generate<R: Rng + ?Sized>(bound: UpperBound, mode: Mode, rng: &mut R) -> Self {
        let direction = Direction::resolve(mode, rng);
        Self::new(draw_number(bound, rng), direction)
    }

    pub fn prompt(&self) -> String {
        format!("* {} = ", self.display)
    }

    /// Compares the reformatted answer with the shown string, byte for byte.
    pub fn is_correct(&self, answer: &str) -> bool {
        self.direction.reformat_answer(answer) == self.display
    }

    pub fn judge(&self, answer: &str, response_secs: u64) -> RoundResult {
        RoundResult {
            correct: self.is_correct(answer),
            response_secs,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RoundResult {
    pub correct: bool,
    pub response_secs: u64,
}
