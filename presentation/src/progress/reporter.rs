//! Progress reporting for agent runs

use agentm_application::ProgressNotifier;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;

/// Reports progress with an indicatif bar per operation
///
/// Sort reports its worst-case comparison count as the total, so a bar may
/// finish before reaching its length.
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
    draw_target: fn() -> ProgressDrawTarget,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
            draw_target: ProgressDrawTarget::stderr,
        }
    }

    /// Reporter that draws nowhere (for tests)
    pub fn hidden() -> Self {
        Self {
            bar: Mutex::new(None),
            draw_target: ProgressDrawTarget::hidden,
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    #[cfg(test)]
    fn position(&self) -> Option<u64> {
        self.bar
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|pb| pb.position()))
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_start(&self, operation: &str, total_tasks: usize) {
        let pb = ProgressBar::with_draw_target(Some(total_tasks as u64), (self.draw_target)());
        pb.set_style(Self::bar_style());
        pb.set_prefix(operation.to_string());
        pb.set_message("Starting...");

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_item_complete(&self, _operation: &str, index: usize, success: bool) {
        if let Ok(guard) = self.bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            let status = if success {
                format!("{} #{}", "v".green(), index)
            } else {
                format!("{} #{}", "x".red(), index)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_finish(&self, operation: &str, success: bool) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(pb) = guard.take()
        {
            if success {
                pb.finish_with_message(format!("{} complete!", operation.green()));
            } else {
                pb.abandon_with_message(format!("{} failed", operation.red()));
            }
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_start(&self, operation: &str, total_tasks: usize) {
        eprintln!("{} {} ({} tasks)", "->".cyan(), operation.bold(), total_tasks);
    }

    fn on_item_complete(&self, _operation: &str, index: usize, success: bool) {
        if success {
            eprintln!("  {} #{}", "v".green(), index);
        } else {
            eprintln!("  {} #{} (failed)", "x".red(), index);
        }
    }

    fn on_finish(&self, operation: &str, success: bool) {
        if success {
            eprintln!("{} {} done", "->".cyan(), operation);
        } else {
            eprintln!("{} {} failed", "->".red(), operation);
        }
    }
}
