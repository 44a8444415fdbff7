//! Clipboard writes and the transient "copied" indicator.

use std::io::ErrorKind;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::lock;
use super::notify::{Notification, Notifier};

/// How long the "copied" indicator stays on after a successful copy.
pub const COPIED_INDICATOR_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("No clipboard tool available (tried {0})")]
    Unavailable(String),

    #[error("Clipboard tool '{tool}' failed: {detail}")]
    Tool { tool: &'static str, detail: String },
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

type ClipboardTool = (&'static str, &'static [&'static str]);

/// Tried in order; the first one present on `PATH` wins.
const CLIPBOARD_TOOLS: &[ClipboardTool] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
];

/// Platform clipboard reached through the usual command-line helpers.
pub struct SystemClipboard {
    candidates: Vec<ClipboardTool>,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self {
            candidates: CLIPBOARD_TOOLS.to_vec(),
        }
    }
}

impl SystemClipboard {
    async fn pipe_into(tool: &'static str, args: &[&str], text: &str) -> Result<(), std::io::Error> {
        let mut child = Command::new(tool)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            // stdin dropped here so the tool sees EOF
        }

        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            Err(std::io::Error::new(
                ErrorKind::Other,
                format!("exited with {status}"),
            ))
        }
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        for &(tool, args) in &self.candidates {
            match Self::pipe_into(tool, args, text).await {
                Ok(()) => {
                    debug!("Copied {} bytes via {}", text.len(), tool);
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(ClipboardError::Tool {
                        tool,
                        detail: e.to_string(),
                    })
                }
            }
        }

        let tried: Vec<&str> = self.candidates.iter().map(|(tool, _)| *tool).collect();
        Err(ClipboardError::Unavailable(tried.join(", ")))
    }
}

#[derive(Debug, Default)]
struct CopiedState {
    index: Option<usize>,
    generation: u64,
}

/// Tracks which suggestion was copied most recently.
///
/// Each copy bumps a generation counter; a reset timer only clears the
/// indicator if no newer copy happened in the meantime.
#[derive(Debug, Clone, Default)]
pub struct CopyTracker {
    state: Arc<Mutex<CopiedState>>,
}

impl CopyTracker {
    pub fn copied_index(&self) -> Option<usize> {
        lock(&self.state).index
    }

    pub fn clear(&self) {
        let mut s = lock(&self.state);
        s.index = None;
        s.generation += 1;
    }

    /// Writes `text` to the clipboard and reports the outcome through `notifier`.
    /// Returns whether the write succeeded.
    pub async fn copy(
        &self,
        index: usize,
        text: &str,
        clipboard: &dyn Clipboard,
        notifier: &dyn Notifier,
    ) -> bool {
        match clipboard.write_text(text).await {
            Ok(()) => {
                self.mark_copied(index);
                notifier.notify(Notification::success(
                    "Copied to clipboard",
                    "The suggested rewrite is ready to paste.",
                ));
                true
            }
            Err(e) => {
                notifier.notify(Notification::error("Copy failed", e.to_string()));
                false
            }
        }
    }

    fn mark_copied(&self, index: usize) {
        let generation = {
            let mut s = lock(&self.state);
            s.generation += 1;
            s.index = Some(index);
            s.generation
        };

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(COPIED_INDICATOR_DURATION).await;
            let mut s = lock(&state);
            if s.generation == generation {
                s.index = None;
            }
        });
    }
}
