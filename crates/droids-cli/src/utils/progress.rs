use droidspp::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 100;

/// Renders workflow progress events as a single stderr spinner/bar.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0).with_style(spinner_style());
        bar.set_draw_target(ProgressDrawTarget::stderr());
        bar.finish_and_clear();
        Self {
            bar: Arc::new(Mutex::new(bar)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = Arc::clone(&self.bar);

        Box::new(move |event: Progress| {
            let Ok(bar) = bar.lock() else {
                warn!("Progress bar lock poisoned; dropping event.");
                return;
            };

            match event {
                Progress::PhaseStart { name } => {
                    bar.reset();
                    bar.set_length(0);
                    bar.set_style(spinner_style());
                    bar.set_message(name);
                    bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                }
                Progress::PhaseFinish => {
                    bar.disable_steady_tick();
                    let phase = bar.message();
                    bar.finish_with_message(format!("✓ {phase}"));
                }
                Progress::TaskStart { total_steps } => {
                    bar.disable_steady_tick();
                    bar.set_style(bar_style());
                    bar.set_length(total_steps);
                    bar.set_position(0);
                }
                Progress::TaskIncrement => bar.inc(1),
                Progress::TaskFinish => {
                    if let Some(length) = bar.length() {
                        bar.set_position(length);
                    }
                }
                Progress::Message(message) => bar.println(format!("  {message}")),
                Progress::Warning(message) => bar.println(format!("  ⚠ {message}")),
            }
        })
    }

    #[cfg(test)]
    fn snapshot(&self) -> (String, Option<u64>, u64, bool) {
        let bar = self.bar.lock().unwrap();
        (bar.message(), bar.length(), bar.position(), bar.is_finished())
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<20} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("eta", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
        })
        .progress_chars("##-")
}
