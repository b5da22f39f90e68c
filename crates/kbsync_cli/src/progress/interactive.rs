use std::sync::Mutex;

use kbsync::sync::SyncProgress;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

#[derive(Default)]
struct Counts {
    created: usize,
    updated: usize,
    skipped: usize,
    failed: usize,
}

impl Counts {
    fn summary(&self) -> String {
        format!(
            "{} created, {} updated, {} unchanged, {} failed",
            self.created, self.updated, self.skipped, self.failed
        )
    }
}

#[derive(Default)]
struct ProgressState {
    /// Created on `JobStarted`; a spinner until the first total is known.
    bar: Option<ProgressBar>,
    counts: Counts,
}

/// Interactive progress reporter using indicatif.
///
/// Import totals grow as containers are listed, so the bar's length is raised
/// on every `ContainerListed` event.
pub struct InteractiveReporter {
    multi: MultiProgress,
    state: Mutex<ProgressState>,
}

impl InteractiveReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            state: Mutex::new(ProgressState::default()),
        }
    }

    pub fn handle(&self, event: SyncProgress) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };

        match event {
            SyncProgress::JobStarted {
                provider,
                direction,
                ..
            } => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::spinner_style());
                pb.enable_steady_tick(std::time::Duration::from_millis(100));
                pb.set_prefix(format!("{:10}", format!("{} {}", direction, provider)));
                pb.set_message("Listing...");
                state.bar = Some(pb);
            }

            SyncProgress::ContainerListed {
                name, total_so_far, ..
            } => {
                if let Some(pb) = &state.bar {
                    Self::ensure_bar(pb);
                    pb.set_length(total_so_far as u64);
                    pb.set_message(format!("Listed {}", name));
                }
            }

            SyncProgress::ExportPlanned { candidates } => {
                if let Some(pb) = &state.bar {
                    Self::ensure_bar(pb);
                    pb.set_length(candidates as u64);
                    pb.set_message("Exporting...");
                }
            }

            SyncProgress::CategoryCreated { name, .. } => {
                let _ = self.multi.println(format!("  + category {}", name));
            }

            SyncProgress::ItemCreated { title, .. } => {
                state.counts.created += 1;
                self.advance(&state, &title);
            }

            SyncProgress::ItemUpdated { title, .. } => {
                state.counts.updated += 1;
                self.advance(&state, &title);
            }

            SyncProgress::ItemSkipped { title, .. } => {
                state.counts.skipped += 1;
                self.advance(&state, &title);
            }

            SyncProgress::ItemFailed { title, error, .. } => {
                state.counts.failed += 1;
                let _ = self
                    .multi
                    .println(format!("  \x1b[31m✗\x1b[0m {}: {}", title, error));
                self.advance(&state, &title);
            }

            SyncProgress::Warning { message } => {
                let _ = self
                    .multi
                    .println(format!("  \x1b[33m!\x1b[0m {}", message));
            }

            SyncProgress::JobCompleted { .. } => {
                if let Some(pb) = &state.bar {
                    pb.finish_with_message(format!("✓ {}", state.counts.summary()));
                }
            }

            SyncProgress::JobFailed { error } => {
                if let Some(pb) = &state.bar {
                    pb.abandon_with_message(format!("✗ {}", error));
                }
            }

            _ => {}
        }
    }

    fn advance(&self, state: &ProgressState, title: &str) {
        if let Some(pb) = &state.bar {
            pb.inc(1);
            pb.set_message(title.to_string());
        }
    }

    /// Switch a spinner to a bar once a total is known.
    fn ensure_bar(pb: &ProgressBar) {
        if pb.length().is_none() {
            pb.disable_steady_tick();
            pb.set_style(Self::bar_style());
        }
    }

    pub fn finish(&self) {
        if let Ok(state) = self.state.lock()
            && let Some(pb) = &state.bar
            && !pb.is_finished()
        {
            pb.finish();
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos:>3}/{len:3} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░")
    }
}

impl Default for InteractiveReporter {
    fn default() -> Self {
        Self::new()
    }
}
