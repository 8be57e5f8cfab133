use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Processing,
    Completed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub status: ProgressStatus,
    /// Percentage, 0 to 100.
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<usize>,
    pub message: String,
}

/// Buffers progress events for one conversion.
///
/// Progress never goes backwards: a report below the previous maximum is
/// raised to it. The host drains the buffer whenever it likes.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    events: Vec<ProgressEvent>,
    high_water: u8,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(
        &mut self,
        status: ProgressStatus,
        progress: u8,
        page: Option<(usize, usize)>,
        message: impl Into<String>,
    ) {
        let progress = progress.min(100).max(self.high_water);
        self.high_water = progress;
        let event = ProgressEvent {
            status,
            progress,
            current_page: page.map(|p| p.0),
            total_pages: page.map(|p| p.1),
            message: message.into(),
        };
        tracing::trace!(progress, message = %event.message, "progress");
        self.events.push(event);
    }

    pub fn processing(&mut self, progress: u8, message: impl Into<String>) {
        self.push(ProgressStatus::Processing, progress, None, message);
    }

    /// Report work on page `current` of `total` (1-based).
    pub fn page(&mut self, progress: u8, current: usize, total: usize, message: impl Into<String>) {
        self.push(ProgressStatus::Processing, progress, Some((current, total)), message);
    }

    pub fn completed(&mut self, message: impl Into<String>) {
        self.push(ProgressStatus::Completed, 100, None, message);
    }

    /// Report a fatal failure. Progress stays where it was.
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ProgressStatus::Error, self.high_water, None, message);
    }

    pub fn last_progress(&self) -> u8 {
        self.high_water
    }

    /// Events not yet drained.
    pub fn pending(&self) -> &[ProgressEvent] {
        &self.events
    }

    /// Take every buffered event, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = ProgressEvent> + '_ {
        self.events.drain(..)
    }
}

/// Progress when starting page `index` (0-based) of `total`, inside the
/// band `start..start + span`.
pub fn page_progress(start: u8, span: u8, index: usize, total: usize) -> u8 {
    if total == 0 {
        return start;
    }
    let done = index.min(total) * span as usize / total;
    start.saturating_add(done as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_never_decreases() {
        let mut t = ProgressTracker::new();
        t.processing(30, "a");
        t.processing(10, "b");
        t.page(50, 1, 2, "c");
        let progress: Vec<u8> = t.drain().map(|e| e.progress).collect();
        assert_eq!(progress, vec![30, 30, 50]);
    }

    #[test]
    fn test_drain_empties_buffer() {
        let mut t = ProgressTracker::new();
        t.processing(10, "start");
        assert_eq!(t.drain().count(), 1);
        assert!(t.pending().is_empty());
        t.completed("done");
        let events: Vec<_> = t.drain().collect();
        assert_eq!(events[0].status, ProgressStatus::Completed);
        assert_eq!(events[0].progress, 100);
    }

    #[test]
    fn test_error_keeps_progress() {
        let mut t = ProgressTracker::new();
        t.processing(40, "working");
        t.error("boom");
        let last = t.pending().last().unwrap();
        assert_eq!(last.status, ProgressStatus::Error);
        assert_eq!(last.progress, 40);
    }

    #[test]
    fn test_page_fields() {
        let mut t = ProgressTracker::new();
        t.page(55, 2, 4, "Processing page 2 of 4");
        let e = &t.pending()[0];
        assert_eq!(e.current_page, Some(2));
        assert_eq!(e.total_pages, Some(4));
        let json = serde_json::to_value(e).unwrap();
        assert_eq!(json["status"], "processing");
    }

    #[test]
    fn test_over_100_clamped() {
        let mut t = ProgressTracker::new();
        t.processing(250, "x");
        assert_eq!(t.last_progress(), 100);
    }

    #[test]
    fn test_page_progress_bands() {
        assert_eq!(page_progress(30, 50, 0, 2), 30);
        assert_eq!(page_progress(30, 50, 1, 2), 55);
        assert_eq!(page_progress(10, 70, 2, 3), 56);
        assert_eq!(page_progress(10, 70, 0, 0), 10);
    }
}
