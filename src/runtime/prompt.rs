//! Interactive configuration form.
//!
//! Asks for each value in turn and re-asks until the answer is acceptable.
//! Generic over the reader and writer so it can be driven from tests.

use std::io::{BufRead, Write};

use crate::config::{SessionConfig, INSTANCE_WARNING_THRESHOLD};
use crate::core::MatchError;

/// Line-oriented prompt over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Wrap an input and output stream.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask once per line until a whole number is entered.
    fn ask_number(&mut self, label: &str) -> Result<i64, MatchError> {
        loop {
            write!(self.output, "{label}: ")?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(MatchError::InputClosed);
            }
            match line.trim().parse() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "Please enter a whole number.")?,
            }
        }
    }

    /// Ask until `reject` returns `None` for the entered value.
    fn ask_until(
        &mut self,
        label: &str,
        reject: impl Fn(i64) -> Option<String>,
    ) -> Result<i64, MatchError> {
        loop {
            let value = self.ask_number(label)?;
            match reject(value) {
                None => return Ok(value),
                Some(msg) => writeln!(self.output, "{msg}")?,
            }
        }
    }

    fn ask_count(&mut self, label: &str, floor: i64, msg: &str) -> Result<u32, MatchError> {
        let value = self.ask_until(label, |v| {
            if v < floor {
                Some(msg.to_string())
            } else if v > i64::from(u32::MAX) {
                Some("Value is too large.".to_string())
            } else {
                None
            }
        })?;
        u32::try_from(value).map_err(|_| MatchError::InvalidConfig(format!("{label} out of range")))
    }

    /// Run the whole form and return a validated configuration.
    pub fn run(&mut self) -> Result<SessionConfig, MatchError> {
        writeln!(self.output, "Please enter the following configuration\n")?;

        let instances = self.ask_until("Max concurrent instances (n)", |v| {
            (v <= 0).then(|| "Must be greater than 0.".to_string())
        })?;
        let max_instances = usize::try_from(instances)
            .map_err(|_| MatchError::InvalidConfig("instance count out of range".into()))?;
        if max_instances > INSTANCE_WARNING_THRESHOLD {
            writeln!(
                self.output,
                "Warning: More than {INSTANCE_WARNING_THRESHOLD} instances may slow down the system."
            )?;
        }

        let tanks = self.ask_count("Number of TANK players", 1, "At least 1 tank required.")?;
        let healers = self.ask_count("Number of HEALER players", 1, "At least 1 healer required.")?;
        let dps = self.ask_count("Number of DPS players", 3, "At least 3 DPS required.")?;

        let min_time = self.ask_until("Minimum clear time (t1)", |v| {
            (v <= 0).then(|| "Must be greater than 0.".to_string())
        })?;
        let max_time = self.ask_until("Maximum clear time (t2)", |v| {
            if v <= 0 {
                Some("Must be greater than 0.".to_string())
            } else if v < min_time {
                Some("Max time must be greater than or equal to min time.".to_string())
            } else {
                None
            }
        })?;

        let cfg = SessionConfig::new(
            max_instances,
            tanks,
            healers,
            dps,
            min_time.unsigned_abs(),
            max_time.unsigned_abs(),
        );
        if let Some(note) = cfg.imbalance_warning() {
            writeln!(self.output, "Note: {note}.")?;
        }
        cfg.validate()?;
        writeln!(self.output, "\nInitializing matchmaking system...\n")?;
        Ok(cfg)
    }
}

/// Collect a configuration interactively from `input`, echoing prompts to
/// `output`.
pub fn prompt_config<R: BufRead, W: Write>(input: R, output: W) -> Result<SessionConfig, MatchError> {
    Prompter::new(input, output).run()
}
