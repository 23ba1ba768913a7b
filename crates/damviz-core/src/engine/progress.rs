/// Events emitted while inputs are processed.
///
/// A batch reports one phase per input file; rendering a file is a task whose steps are
/// frames.
#[derive(Debug, Clone)]
pub enum Progress {
    /// Processing of one input starts; `name` is its file name.
    PhaseStart { name: String },
    PhaseFinish,

    /// Frame rendering starts with `total` frames to go.
    TaskStart { total: u64 },
    TaskIncrement { amount: u64 },
    /// Every frame is written and the outputs are finalized.
    TaskFinish,

    StatusUpdate { text: String },
    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn reporter_without_callback_is_a_no_op() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::Message("ignored".into()));
    }

    #[test]
    fn reporter_forwards_events_in_order() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |p| {
            sink.lock().unwrap().push(format!("{:?}", p));
        }));

        reporter.report(Progress::PhaseStart {
            name: "Rendering".into(),
        });
        reporter.report(Progress::TaskIncrement { amount: 1 });
        reporter.report(Progress::PhaseFinish);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 3);
        assert!(events[0].contains("Rendering"));
        assert_eq!(events[2], "PhaseFinish");
    }
}
