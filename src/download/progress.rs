//! Progress display for archive downloads

use indicatif::{ProgressBar, ProgressStyle};

/// Receives transfer progress while a body is streamed to disk
pub trait ProgressSink: Send + Sync {
    /// Called once before the first chunk. `total` is 0 when the server did
    /// not declare a content length.
    fn start(&self, total: u64);
    /// Called after each chunk has been written.
    fn advance(&self, bytes: u64);
    fn finish(&self);
    /// Called when the transfer failed midway.
    fn abandon(&self);
}

/// Terminal progress bar labelled with the archive name
pub struct DownloadProgress {
    pb: ProgressBar,
}

impl DownloadProgress {
    pub fn new(label: &str) -> Self {
        let pb = ProgressBar::no_length();
        pb.set_message(label.to_string());
        Self { pb }
    }
}

impl ProgressSink for DownloadProgress {
    fn start(&self, total: u64) {
        if total > 0 {
            let style = ProgressStyle::default_bar()
                .template("{msg}: [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-");
            self.pb.set_style(style);
            self.pb.set_length(total);
        } else {
            // Unknown size: count bytes without a bar
            let style = ProgressStyle::default_spinner()
                .template("{spinner} {msg}: {bytes} ({bytes_per_sec})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            self.pb.set_style(style);
        }
    }

    fn advance(&self, bytes: u64) {
        self.pb.inc(bytes);
    }

    fn finish(&self) {
        self.pb.finish();
    }

    fn abandon(&self) {
        self.pb.abandon();
    }
}

/// Records progress events so tests can assert on them
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingProgress {
    state: std::sync::Mutex<RecordedState>,
}

#[cfg(test)]
#[derive(Default)]
struct RecordedState {
    total: Option<u64>,
    transferred: u64,
    finished: bool,
    abandoned: bool,
}

#[cfg(test)]
impl RecordingProgress {
    pub(crate) fn total(&self) -> Option<u64> {
        self.state.lock().unwrap().total
    }

    pub(crate) fn transferred(&self) -> u64 {
        self.state.lock().unwrap().transferred
    }

    pub(crate) fn finished(&self) -> bool {
        self.state.lock().unwrap().finished
    }

    pub(crate) fn abandoned(&self) -> bool {
        self.state.lock().unwrap().abandoned
    }
}

#[cfg(test)]
impl ProgressSink for RecordingProgress {
    fn start(&self, total: u64) {
        self.state.lock().unwrap().total = Some(total);
    }

    fn advance(&self, bytes: u64) {
        self.state.lock().unwrap().transferred += bytes;
    }

    fn finish(&self) {
        self.state.lock().unwrap().finished = true;
    }

    fn abandon(&self) {
        self.state.lock().unwrap().abandoned = true;
    }
}
