use std::io::Write;

use crossterm::style::Stylize;
use rand::Rng;

use crate::config::{BoundInput, Defaults, GameConfig, Mode, UpperBound};
use crate::error::{GameError, Result};
use crate::round::Round;
use crate::runtime::{elapsed_secs, Clock, GameEvent, GameEventSource};
use crate::stats::SessionStats;

const CLAMP_NOTICE: &str = "Number can't be greater than 256! Setting it to 256 for you :)";
const FAILURE_NOTICE: &str = "Oops, you got that last one wrong...";
const INTERRUPT_NOTICE: &str = "CTRL+C pressed in terminal";

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    FailedRound,
    Interrupted,
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Configuring,
    Playing,
    Terminated(SessionOutcome),
}

/// Result of one round, as seen by the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    End(SessionOutcome),
}

/// Answers supplied up front, e.g. from command-line flags. `None` means ask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Presets {
    pub bound: Option<BoundInput>,
    pub mode: Option<Mode>,
}

/// One game, from the startup prompts to the summary.
pub struct Session<E, C, R, W> {
    events: E,
    clock: C,
    rng: R,
    out: W,
    styled: bool,
    state: SessionState,
    config: Option<GameConfig>,
    stats: SessionStats,
}

impl<E, C, R, W> Session<E, C, R, W>
where
    E: GameEventSource,
    C: Clock,
    R: Rng,
    W: Write,
{
    pub fn new(events: E, clock: C, rng: R, out: W) -> Self {
        Self {
            events,
            clock,
            rng,
            out,
            styled: false,
            state: SessionState::Configuring,
            config: None,
            stats: SessionStats::new(),
        }
    }

    /// Colour the verdict line. Only useful when `out` is a terminal.
    pub fn with_styling(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> Option<GameConfig> {
        self.config
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs the whole session and prints the summary once if any round was reached.
    pub fn run(&mut self, defaults: &Defaults, presets: Presets) -> Result<SessionOutcome> {
        if let Err(outcome) = self.configure(defaults, presets)? {
            tracing::info!(?outcome, "session ended during configuration");
            return Ok(outcome);
        }

        writeln!(self.out, "To stop the game use CTRL+C")?;
        let outcome = loop {
            if let Step::End(outcome) = self.play_round()? {
                break outcome;
            }
        };
        self.terminate(outcome)?;
        Ok(outcome)
    }

    /// Collects bound and mode, re-prompting on invalid input.
    ///
    /// The inner `Err` carries the outcome when input ends before both values are known.
    pub fn configure(
        &mut self,
        defaults: &Defaults,
        presets: Presets,
    ) -> Result<std::result::Result<GameConfig, SessionOutcome>> {
        debug_assert_eq!(self.state, SessionState::Configuring);

        let bound_input = match presets.bound {
            Some(input) => input,
            None => match self.prompt_bound(defaults.bound())? {
                Ok(input) => input,
                Err(outcome) => return Ok(Err(self.abandon(outcome))),
            },
        };
        if bound_input == BoundInput::Clamped {
            writeln!(self.out, "{}", CLAMP_NOTICE)?;
        }
        let upper_bound = bound_input.resolve(defaults.bound());

        let mode = match presets.mode {
            Some(mode) => mode,
            None => match self.prompt_mode(defaults.mode)? {
                Ok(mode) => mode,
                Err(outcome) => return Ok(Err(self.abandon(outcome))),
            },
        };

        let config = GameConfig { upper_bound, mode };
        tracing::debug!(upper_bound = upper_bound.get(), %mode, "session configured");
        self.config = Some(config);
        self.state = SessionState::Playing;
        Ok(Ok(config))
    }

    fn prompt_bound(
        &mut self,
        default: UpperBound,
    ) -> Result<std::result::Result<BoundInput, SessionOutcome>> {
        loop {
            write!(
                self.out,
                "Choose a maximal number [default is {}]: ",
                default.get()
            )?;
            self.out.flush()?;
            let line = match self.read_line() {
                Ok(line) => line,
                Err(outcome) => return Ok(Err(outcome)),
            };
            match BoundInput::parse(&line) {
                Ok(input) => return Ok(Ok(input)),
                Err(e @ GameError::InvalidBound(_)) => writeln!(self.out, "Error: {}", e)?,
                Err(e) => return Err(e),
            }
        }
    }

    fn prompt_mode(&mut self, default: Mode) -> Result<std::result::Result<Mode, SessionOutcome>> {
        loop {
            write!(self.out, "Game mode (x2d, d2x, both) [{}]: ", default)?;
            self.out.flush()?;
            let line = match self.read_line() {
                Ok(line) => line,
                Err(outcome) => return Ok(Err(outcome)),
            };
            let token = line.trim();
            if token.is_empty() {
                return Ok(Ok(default));
            }
            match token.parse::<Mode>() {
                Ok(mode) => return Ok(Ok(mode)),
                Err(e @ GameError::InvalidMode(_)) => writeln!(self.out, "Error: {}", e)?,
                Err(e) => return Err(e),
            }
        }
    }

    /// Plays one round. An interrupt or closed input abandons it uncounted.
    pub fn play_round(&mut self) -> Result<Step> {
        let Some(config) = self.config else {
            return Err(GameError::NotConfigured);
        };

        let round = Round::generate(config.upper_bound, config.mode, &mut self.rng);
        let start = self.clock.now_secs();
        write!(self.out, "{}", round.prompt())?;
        self.out.flush()?;

        let answer = match self.read_line() {
            Ok(answer) => answer,
            Err(outcome) => {
                tracing::debug!(?outcome, display = %round.display, "round abandoned");
                return Ok(Step::End(outcome));
            }
        };
        let response_secs = elapsed_secs(start, self.clock.now_secs());

        let result = round.judge(&answer, response_secs);
        self.stats.record(result.response_secs);
        tracing::debug!(
            number = round.number,
            direction = ?round.direction,
            answer = %answer,
            correct = result.correct,
            response_secs,
            "round played"
        );

        if result.correct {
            return Ok(Step::Continue);
        }
        if self.styled {
            writeln!(self.out, "{}", FAILURE_NOTICE.red())?;
        } else {
            writeln!(self.out, "{}", FAILURE_NOTICE)?;
        }
        Ok(Step::End(SessionOutcome::FailedRound))
    }

    /// Moves to `Terminated` and prints the summary. The only place the summary is written.
    fn terminate(&mut self, outcome: SessionOutcome) -> Result<()> {
        match outcome {
            SessionOutcome::Interrupted => writeln!(self.out, "\n{}", INTERRUPT_NOTICE)?,
            SessionOutcome::InputClosed => writeln!(self.out)?,
            SessionOutcome::FailedRound => {}
        }
        writeln!(self.out, "\n{}", self.stats.summary_line())?;
        self.out.flush()?;
        self.state = SessionState::Terminated(outcome);
        tracing::info!(
            ?outcome,
            iterations = self.stats.iterations(),
            average_secs = self.stats.average_response_secs(),
            "session ended"
        );
        Ok(())
    }

    fn abandon(&mut self, outcome: SessionOutcome) -> SessionOutcome {
        let _ = writeln!(self.out);
        self.state = SessionState::Terminated(outcome);
        outcome
    }

    fn read_line(&mut self) -> std::result::Result<String, SessionOutcome> {
        match self.events.next_event() {
            GameEvent::Line(line) => Ok(line),
            GameEvent::Interrupted => Err(SessionOutcome::Interrupted),
            GameEvent::Closed => Err(SessionOutcome::InputClosed),
        }
    }
}
