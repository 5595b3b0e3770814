use std::io::{BufRead, Write};

use quiz_core::model::{LeaderboardRecord, ScoreTier};
use services::Frontend;

/// Line-oriented frontend over any reader/writer pair (stdin/stdout in the binary).
pub struct TerminalFrontend<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalFrontend<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn say(&mut self, line: &str) {
        if let Err(e) = writeln!(self.output, "{line}") {
            tracing::debug!(error = %e, "terminal write failed");
        }
    }

    /// `None` on end of input or a read error.
    fn ask(&mut self, prompt: &str) -> Option<String> {
        if write!(self.output, "{prompt}")
            .and_then(|()| self.output.flush())
            .is_err()
        {
            return None;
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_owned()),
        }
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> bool {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let Some(reply) = self.ask(&format!("{prompt} {hint} ")) else {
                return false;
            };
            match reply.to_ascii_lowercase().as_str() {
                "" => return default,
                "y" | "yes" => return true,
                "n" | "no" => return false,
                _ => self.say("Please answer y or n."),
            }
        }
    }
}

impl<R: BufRead, W: Write> Frontend for TerminalFrontend<R, W> {
    fn prompt_name(&mut self) -> Option<String> {
        self.ask("Enter your name: ")
    }

    fn prompt_start(&mut self) -> bool {
        self.confirm("Start quiz?", true)
    }

    fn prompt_reset(&mut self) -> bool {
        self.confirm("Reset quiz?", false)
    }

    fn prompt_answer(&mut self, name: &str, options: &[String], default: &str) -> String {
        self.say("");
        self.say(&format!("What does {name} do?"));
        self.say("  0) (no answer)");
        for (i, option) in options.iter().enumerate() {
            self.say(&format!("  {}) {option}", i + 1));
        }

        let current = if default.is_empty() { "none" } else { default };
        loop {
            let Some(reply) = self.ask(&format!("Choice [current: {current}]: ")) else {
                return default.to_owned();
            };
            if reply.is_empty() {
                return default.to_owned();
            }
            match reply.parse::<usize>() {
                Ok(0) => return String::new(),
                Ok(n) if n <= options.len() => return options[n - 1].clone(),
                _ => self.say(&format!("Enter a number from 0 to {}.", options.len())),
            }
        }
    }

    fn prompt_check(&mut self) -> bool {
        self.confirm("Check my matches?", true)
    }

    fn show_verdict(&mut self, name: &str, is_correct: bool, correct: &str, chosen: &str) {
        if is_correct {
            self.say(&format!("[ok] {name}: Correct!"));
        } else {
            let chosen = if chosen.is_empty() { "(nothing)" } else { chosen };
            self.say(&format!("[x]  {name}: Not quite! You picked: {chosen}"));
            self.say(&format!("     It actually does: {correct}"));
        }
    }

    fn show_summary(&mut self, correct_count: u32, total: u32, tier: ScoreTier) {
        self.say("");
        let line = match tier {
            ScoreTier::Perfect => {
                "Perfect score! You really know your open source tools.".to_owned()
            }
            ScoreTier::Good => format!("Not bad! You got {correct_count} out of {total} right."),
            ScoreTier::NeedsPractice => {
                format!("Only {correct_count} correct. Want to try again?")
            }
        };
        self.say(&line);
    }

    fn show_leaderboard(&mut self, records: &[LeaderboardRecord], total: u32) {
        self.say("");
        self.say("== Leaderboard ==");
        if records.is_empty() {
            self.say("No leaderboard data yet.");
            return;
        }
        for record in records {
            self.say(&format!(
                "Name: {}, Score: {}/{total}, Time: {} seconds",
                record.user_name, record.correct_count, record.duration
            ));
        }
    }

    fn show_error(&mut self, message: &str) {
        self.say(&format!("! {message}"));
    }
}
