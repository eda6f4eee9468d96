#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    Message(String),
    /// A recoverable problem the user should see (failed scope, degenerate input).
    Warning(String),
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

    /// Brackets `body` with [`Progress::PhaseStart`] and [`Progress::PhaseFinish`].
    pub fn phase<T>(&self, name: &'static str, body: impl FnOnce() -> T) -> T {
        self.report(Progress::PhaseStart { name });
        let result = body();
        self.report(Progress::PhaseFinish);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_is_silent() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::TaskIncrement);
        assert_eq!(reporter.phase("noop", || 7), 7);
    }

    #[test]
    fn phase_brackets_events_emitted_by_the_body() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(format!("{event:?}"));
        }));
        reporter.phase("Divergence", || {
            reporter.report(Progress::Message("working".into()));
        });
        drop(reporter);
        let events = events.into_inner().unwrap();
        assert_eq!(
            events,
            vec![
                "PhaseStart { name: \"Divergence\" }",
                "Message(\"working\")",
                "PhaseFinish"
            ]
        );
    }
}
