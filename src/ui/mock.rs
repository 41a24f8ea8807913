//! Recording UI for tests.
//!
//! Everything written through `MockUI` lands in one ordered log tagged by
//! channel, so tests can assert on content as well as on ordering.
//!
//! ```
//! use invoke::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Listing stubs");
//! ui.warning("Stub 'Demo' has no Commands directory");
//!
//! assert!(ui.has_message("Listing"));
//! assert!(ui.has_warning("no Commands"));
//! ```

use super::{InvokeTheme, OutputMode, SpinnerHandle, UserInterface};

/// Where a recorded line was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Message,
    Success,
    Warning,
    Error,
    Header,
    Hint,
    Spinner,
}

/// A `UserInterface` that records instead of printing.
#[derive(Debug)]
pub struct MockUI {
    mode: OutputMode,
    theme: InvokeTheme,
    interactive: bool,
    log: Vec<(Channel, String)>,
}

impl Default for MockUI {
    fn default() -> Self {
        Self::new()
    }
}

impl MockUI {
    pub fn new() -> Self {
        Self::with_mode(OutputMode::Normal)
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            theme: InvokeTheme::plain(),
            interactive: false,
            log: Vec::new(),
        }
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// The full log in the order it was written.
    pub fn log(&self) -> &[(Channel, String)] {
        &self.log
    }

    /// Lines sent to one channel.
    pub fn on(&self, channel: Channel) -> Vec<&str> {
        self.log
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, line)| line.as_str())
            .collect()
    }

    fn contains(&self, channel: Channel, needle: &str) -> bool {
        self.log
            .iter()
            .any(|(c, line)| *c == channel && line.contains(needle))
    }

    pub fn messages(&self) -> Vec<&str> {
        self.on(Channel::Message)
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.on(Channel::Warning)
    }

    pub fn errors(&self) -> Vec<&str> {
        self.on(Channel::Error)
    }

    pub fn headers(&self) -> Vec<&str> {
        self.on(Channel::Header)
    }

    /// Spinner start messages.
    pub fn spinners(&self) -> Vec<&str> {
        self.on(Channel::Spinner)
    }

    pub fn has_message(&self, needle: &str) -> bool {
        self.contains(Channel::Message, needle)
    }

    pub fn has_success(&self, needle: &str) -> bool {
        self.contains(Channel::Success, needle)
    }

    pub fn has_warning(&self, needle: &str) -> bool {
        self.contains(Channel::Warning, needle)
    }

    pub fn has_error(&self, needle: &str) -> bool {
        self.contains(Channel::Error, needle)
    }

    pub fn has_hint(&self, needle: &str) -> bool {
        self.contains(Channel::Hint, needle)
    }

    fn record(&mut self, channel: Channel, line: &str) {
        self.log.push((channel, line.to_string()));
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn theme(&self) -> &InvokeTheme {
        &self.theme
    }

    fn message(&mut self, msg: &str) {
        self.record(Channel::Message, msg);
    }

    fn success(&mut self, msg: &str) {
        self.record(Channel::Success, msg);
    }

    fn warning(&mut self, msg: &str) {
        self.record(Channel::Warning, msg);
    }

    fn error(&mut self, msg: &str) {
        self.record(Channel::Error, msg);
    }

    fn show_header(&mut self, title: &str) {
        self.record(Channel::Header, title);
    }

    fn show_hint(&mut self, hint: &str) {
        self.record(Channel::Hint, hint);
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.record(Channel::Spinner, message);
        Box::new(MockSpinner::new())
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// How a mock spinner was finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerStatus {
    Success,
    Error,
    Skipped,
}

/// Spinner that remembers its updates and how it ended.
#[derive(Debug, Default)]
pub struct MockSpinner {
    updates: Vec<String>,
    finished: Option<(SpinnerStatus, String)>,
}

impl MockSpinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> &[String] {
        &self.updates
    }

    pub fn finished(&self) -> Option<(SpinnerStatus, &str)> {
        self.finished
            .as_ref()
            .map(|(status, msg)| (*status, msg.as_str()))
    }

    fn finish(&mut self, status: SpinnerStatus, msg: &str) {
        self.finished = Some((status, msg.to_string()));
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, msg: &str) {
        self.updates.push(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Success, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Error, msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Skipped, msg);
    }
}
