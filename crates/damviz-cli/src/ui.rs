use damviz::engine::progress::{Progress, ProgressCallback};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::warn;

const UI_CHANNEL_CAPACITY: usize = 1024;
const SPINNER_TICK: Duration = Duration::from_millis(80);
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_BAR_TEMPLATE: &str = "{msg:<40} [{bar:40.cyan/blue}] {pos}/{len} ({eta})";

#[derive(Debug)]
pub enum UiEvent {
    Progress(Progress),
    Log(String),
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(SPINNER_FRAMES)
}

fn frame_bar_style() -> ProgressStyle {
    ProgressStyle::with_template(FRAME_BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸ ")
}

/// Terminal line of the input file being processed.
///
/// Starts as a spinner and becomes a bar once the frame count is known. The file counts as
/// completed only after its task finished, which the workflow reports once every output is
/// finalized.
struct FileBar {
    bar: ProgressBar,
    name: String,
    completed: bool,
}

impl FileBar {
    fn start(mp: &MultiProgress, name: String) -> Self {
        let bar = mp.add(ProgressBar::new_spinner());
        bar.set_style(spinner_style());
        bar.enable_steady_tick(SPINNER_TICK);
        bar.set_message(name.clone());
        Self {
            bar,
            name,
            completed: false,
        }
    }

    fn begin_frames(&self, total: u64) {
        self.bar.disable_steady_tick();
        self.bar.set_style(frame_bar_style());
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.bar.set_message(self.name.clone());
    }

    fn annotate(&self, status: &str) {
        self.bar.set_message(format!("{} ({})", self.name, status));
    }

    fn complete(&mut self) {
        self.bar.finish();
        self.completed = true;
    }

    fn summary_line(&self) -> String {
        let mark = if self.completed { "✓" } else { "✗" };
        format!("{} {}", mark, self.name)
    }

    /// Removes the bar and returns the line printed in its place.
    fn close(self) -> String {
        self.bar.finish_and_clear();
        self.summary_line()
    }
}

/// Owns the terminal while a command runs: log lines scroll above a line for the file in
/// progress, which is replaced by a ✓ or ✗ when the file is done.
pub struct UiManager {
    mp: Arc<MultiProgress>,
    current: Option<FileBar>,
    event_receiver: mpsc::Receiver<UiEvent>,
    shutdown_receiver: watch::Receiver<bool>,
    _sentinel_bar: ProgressBar,
}

impl UiManager {
    pub fn new() -> (Self, mpsc::Sender<UiEvent>, watch::Sender<bool>) {
        let (event_sender, event_receiver) = mpsc::channel(UI_CHANNEL_CAPACITY);
        let (shutdown_sender, shutdown_receiver) = watch::channel(false);

        let mp = Arc::new(MultiProgress::with_draw_target(
            ProgressDrawTarget::stderr_with_hz(12),
        ));
        let _sentinel_bar = mp.add(ProgressBar::hidden());

        let manager = Self {
            mp,
            current: None,
            event_receiver,
            shutdown_receiver,
            _sentinel_bar,
        };
        (manager, event_sender, shutdown_sender)
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                event = self.event_receiver.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => break,
                },
                changed = self.shutdown_receiver.changed() => {
                    if changed.is_err() || *self.shutdown_receiver.borrow() {
                        break;
                    }
                }
            }
        }

        // Events queued before the shutdown signal still reach the terminal.
        while let Ok(event) = self.event_receiver.try_recv() {
            self.handle_event(event);
        }
        if let Some(file) = self.current.take() {
            file.bar.finish_and_clear();
        }
        self._sentinel_bar.finish_and_clear();
    }

    fn print(&self, line: impl AsRef<str>) {
        self.mp.println(line).ok();
    }

    fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Log(line) => self.print(line),
            UiEvent::Progress(progress) => self.handle_progress(progress),
        }
    }

    fn handle_progress(&mut self, progress: Progress) {
        match progress {
            Progress::PhaseStart { name } => {
                if let Some(previous) = self.current.take() {
                    previous.bar.finish_and_clear();
                }
                self.current = Some(FileBar::start(&self.mp, name));
            }
            Progress::PhaseFinish => {
                if let Some(file) = self.current.take() {
                    let line = file.close();
                    self.print(line);
                }
            }
            Progress::TaskStart { total } => {
                if let Some(file) = &self.current {
                    file.begin_frames(total);
                }
            }
            Progress::TaskIncrement { amount } => {
                if let Some(file) = &self.current {
                    file.bar.inc(amount);
                }
            }
            Progress::TaskFinish => {
                if let Some(file) = self.current.as_mut() {
                    file.complete();
                }
            }
            Progress::StatusUpdate { text } => {
                if let Some(file) = &self.current {
                    file.annotate(&text);
                }
            }
            Progress::Message(msg) => self.print(format!("  {}", msg)),
        }
    }
}

/// Turns engine progress callbacks into UI events.
#[derive(Clone)]
pub struct CliProgressHandler {
    sender: mpsc::Sender<UiEvent>,
}

impl CliProgressHandler {
    pub fn new(sender: mpsc::Sender<UiEvent>) -> Self {
        Self { sender }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let sender = self.sender.clone();
        Box::new(move |progress: Progress| {
            if let Err(e) = sender.try_send(UiEvent::Progress(progress)) {
                warn!("Dropped progress update for the terminal UI: {}", e);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_manager() -> UiManager {
        let (manager, _, _) = UiManager::new();
        manager.mp.set_draw_target(ProgressDrawTarget::hidden());
        manager
    }

    fn send(manager: &mut UiManager, progress: Progress) {
        manager.handle_event(UiEvent::Progress(progress));
    }

    fn start_file(manager: &mut UiManager, name: &str) {
        send(manager, Progress::PhaseStart { name: name.into() });
    }

    fn current(manager: &UiManager) -> &FileBar {
        manager.current.as_ref().unwrap()
    }

    #[test]
    fn phase_start_creates_spinner_for_the_file() {
        let mut manager = quiet_manager();
        assert!(manager.current.is_none());

        start_file(&mut manager, "particle_1.cif");

        assert_eq!(current(&manager).bar.message(), "particle_1.cif");
        assert_eq!(current(&manager).name, "particle_1.cif");
    }

    #[test]
    fn next_file_replaces_the_previous_bar() {
        let mut manager = quiet_manager();
        start_file(&mut manager, "a.cif");
        start_file(&mut manager, "b.pdb");

        assert_eq!(current(&manager).bar.message(), "b.pdb");
        assert!(!current(&manager).completed);
    }

    #[test]
    fn task_start_turns_spinner_into_frame_bar() {
        let mut manager = quiet_manager();
        start_file(&mut manager, "a.cif");

        send(&mut manager, Progress::TaskStart { total: 300 });
        send(&mut manager, Progress::TaskIncrement { amount: 12 });

        let file = current(&manager);
        assert_eq!(file.bar.length(), Some(300));
        assert_eq!(file.bar.position(), 12);
        assert!(!file.completed);
    }

    #[test]
    fn finished_task_marks_the_file_completed() {
        let mut manager = quiet_manager();
        start_file(&mut manager, "a.cif");
        send(&mut manager, Progress::TaskStart { total: 3 });

        send(&mut manager, Progress::TaskFinish);

        let file = current(&manager);
        assert!(file.bar.is_finished());
        assert_eq!(file.summary_line(), "✓ a.cif");
    }

    #[test]
    fn file_without_finished_task_is_marked_failed() {
        let mut manager = quiet_manager();
        start_file(&mut manager, "broken.cif");
        assert_eq!(current(&manager).summary_line(), "✗ broken.cif");

        // All frames written, then the encoder failed while finalizing.
        send(&mut manager, Progress::TaskStart { total: 2 });
        send(&mut manager, Progress::TaskIncrement { amount: 2 });
        assert_eq!(current(&manager).summary_line(), "✗ broken.cif");
    }

    #[test]
    fn phase_finish_closes_the_file_line() {
        let mut manager = quiet_manager();
        start_file(&mut manager, "a.cif");
        send(&mut manager, Progress::TaskFinish);

        send(&mut manager, Progress::PhaseFinish);
        assert!(manager.current.is_none());

        // A stray finish without a file is ignored.
        send(&mut manager, Progress::PhaseFinish);
        assert!(manager.current.is_none());
    }

    #[test]
    fn status_update_decorates_the_file_name() {
        let mut manager = quiet_manager();
        start_file(&mut manager, "a.cif");

        send(
            &mut manager,
            Progress::StatusUpdate {
                text: "Preparing geometry".into(),
            },
        );

        assert_eq!(current(&manager).bar.message(), "a.cif (Preparing geometry)");
    }

    #[test]
    fn log_and_message_events_do_not_open_a_file_line() {
        let mut manager = quiet_manager();
        manager.handle_event(UiEvent::Log("a log line".to_string()));
        send(&mut manager, Progress::Message("note".to_string()));
        assert!(manager.current.is_none());
    }

    #[tokio::test]
    async fn progress_handler_forwards_events() {
        let (sender, mut receiver) = mpsc::channel(1);
        let callback = CliProgressHandler::new(sender).get_callback();

        callback(Progress::TaskIncrement { amount: 7 });

        match receiver.recv().await.unwrap() {
            UiEvent::Progress(Progress::TaskIncrement { amount }) => assert_eq!(amount, 7),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn manager_drains_queue_and_stops_on_shutdown() {
        let (manager, sender, shutdown) = UiManager::new();
        manager.mp.set_draw_target(ProgressDrawTarget::hidden());
        let handle = tokio::spawn(manager.run());

        sender
            .send(UiEvent::Log("before shutdown".into()))
            .await
            .unwrap();
        shutdown.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("UI manager did not stop")
            .unwrap();
    }
}
