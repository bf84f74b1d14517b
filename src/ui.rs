use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::{Duration, Instant};

use crate::analysis::Stage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiMode {
    Auto,
    Plain,
    Pretty,
}

impl std::str::FromStr for UiMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(UiMode::Auto),
            "plain" => Ok(UiMode::Plain),
            "pretty" => Ok(UiMode::Pretty),
            other => Err(format!("unknown ui mode '{}' (auto, plain, pretty)", other)),
        }
    }
}

/// Terminal progress for the CLI: bars on a TTY, plain lines otherwise.
#[derive(Clone, Debug)]
pub struct Ui {
    mode: UiMode,
    is_tty: bool,
}

impl Ui {
    pub fn new(mode: UiMode, is_tty: bool) -> Self {
        Self { mode, is_tty }
    }

    fn pretty(&self) -> bool {
        self.is_tty
            && match self.mode {
                UiMode::Pretty | UiMode::Auto => true,
                UiMode::Plain => false,
            }
    }

    /// Progress display for one analysis run, driven by stage callbacks.
    pub fn analysis(&self) -> AnalysisProgress {
        let bar = if self.pretty() {
            let bar = ProgressBar::new(100);
            bar.set_draw_target(ProgressDrawTarget::stderr());
            let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style);
            Some(bar)
        } else {
            None
        };
        AnalysisProgress {
            bar,
            start: Instant::now(),
        }
    }

    /// Announce a named step; completion is printed when the guard drops.
    pub fn step(&self, name: &str) -> StepGuard {
        if self.pretty() {
            let spinner = ProgressBar::new_spinner();
            spinner.set_draw_target(ProgressDrawTarget::stderr());
            spinner.enable_steady_tick(Duration::from_millis(120));
            let style = ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            spinner.set_style(style);
            spinner.set_message(format!("{name}…"));
            StepGuard::new(name.to_string(), Some(spinner))
        } else {
            eprintln!("==> {}", name);
            StepGuard::new(name.to_string(), None)
        }
    }
}

pub struct AnalysisProgress {
    bar: Option<ProgressBar>,
    start: Instant,
}

impl AnalysisProgress {
    /// Show `stage` as the current status and advance to its progress mark.
    pub fn stage(&mut self, stage: &Stage) {
        match &self.bar {
            Some(bar) => {
                bar.set_message(stage.message);
                bar.set_position(u64::from(stage.progress));
            }
            None => eprintln!("[{:>3}%] {}", stage.progress, stage.message),
        }
    }

    pub fn finish(self) {
        let message = format!("✔ analysis complete ({})", format_duration(self.start.elapsed()));
        match self.bar {
            Some(bar) => bar.finish_with_message(message),
            None => eprintln!("{message}"),
        }
    }
}

pub struct StepGuard {
    name: String,
    start: Instant,
    spinner: Option<ProgressBar>,
}

impl StepGuard {
    fn new(name: String, spinner: Option<ProgressBar>) -> Self {
        Self {
            name,
            start: Instant::now(),
            spinner,
        }
    }
}

impl Drop for StepGuard {
    fn drop(&mut self) {
        let message = format!("✔ {} ({})", self.name, format_duration(self.start.elapsed()));
        if let Some(spinner) = &self.spinner {
            spinner.finish_with_message(message);
        } else {
            eprintln!("{message}");
        }
    }
}

fn format_duration(duration: Duration) -> String {
    if duration.as_secs() >= 1 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_short_and_long_durations() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(5500)), "5.50s");
    }

    #[test]
    fn plain_mode_never_draws_bars() {
        let ui = Ui::new(UiMode::Plain, true);
        assert!(!ui.pretty());
        assert!(!Ui::new(UiMode::Pretty, false).pretty());
        assert!(Ui::new(UiMode::Auto, true).pretty());
    }

    #[test]
    fn parses_modes() {
        assert_eq!("pretty".parse::<UiMode>().unwrap(), UiMode::Pretty);
        assert!("fancy".parse::<UiMode>().is_err());
    }
}
