//! Session state
//!
//! The view state of one user: active mode, loading flag, results and the
//! list page. Presentation layers drive it through explicit transitions and
//! read it back with [`Session::snapshot`].
//!
//! At most one analysis is active. Starting a new one supersedes the old run:
//! its token is cancelled and its late result is ignored.

mod view;

pub use view::{
    ListItem, SessionView, EMPTY_MESSAGE, LOADING_MESSAGE, PLACEHOLDER_AVATAR, PROFILE_BASE_URL,
    SHARE_LINK,
};

use crate::analyzer::AnalysisOutcome;
use crate::error::{Error, Result};
use crate::types::{Fid, Mode, Threshold, UserRecord};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Rows per list page
pub const ITEMS_PER_PAGE: usize = 10;

/// Identifies one analysis run within a session
pub type RunId = u64;

/// Handle given to whoever executes a run
#[derive(Debug, Clone)]
pub struct RunTicket {
    /// Run id to pass back to `finish_analysis`
    pub id: RunId,
    /// Filter the run applies
    pub threshold: Threshold,
    /// Cancelled when the run is abandoned or superseded
    pub cancel: CancellationToken,
}

#[derive(Debug)]
struct ActiveRun {
    id: RunId,
    cancel: CancellationToken,
}

/// View state of one user
#[derive(Debug, Default)]
pub struct Session {
    mode: Mode,
    loading: bool,
    analysis_done: bool,
    results: Vec<UserRecord>,
    current_page: usize,
    share_link: Option<String>,
    message: Option<String>,
    active: Option<ActiveRun>,
    last_run: RunId,
}

impl Session {
    /// Create a session showing the main menu
    pub fn new() -> Self {
        Self {
            current_page: 1,
            ..Default::default()
        }
    }

    /// Active view
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// An analysis is running
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The active view has finished loading
    pub fn is_done(&self) -> bool {
        self.analysis_done
    }

    /// Filtered results of the last completed run
    pub fn results(&self) -> &[UserRecord] {
        &self.results
    }

    /// One-based list page
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Share link, set only in the share view
    pub fn share_link(&self) -> Option<&str> {
        self.share_link.as_deref()
    }

    /// Last user-visible message (error or cancellation notice)
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Id of the run currently in progress
    pub fn active_run(&self) -> Option<RunId> {
        self.active.as_ref().map(|run| run.id)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Start an analysis, superseding any run in progress
    pub fn begin_analysis(&mut self, threshold: Threshold) -> RunTicket {
        if let Some(previous) = self.active.take() {
            debug!("Run {} superseded", previous.id);
            previous.cancel.cancel();
        }

        self.last_run += 1;
        let cancel = CancellationToken::new();
        self.active = Some(ActiveRun {
            id: self.last_run,
            cancel: cancel.clone(),
        });

        self.reset_view();
        self.mode = threshold.mode();
        self.loading = true;

        RunTicket {
            id: self.last_run,
            threshold,
            cancel,
        }
    }

    /// Record how a run ended.
    ///
    /// Returns `false` and changes nothing when `run` is no longer the active
    /// run (it was cancelled or superseded).
    pub fn finish_analysis(&mut self, run: RunId, outcome: Result<AnalysisOutcome>) -> bool {
        if self.active_run() != Some(run) {
            debug!("Ignoring result of stale run {run}");
            return false;
        }
        self.active = None;

        match outcome {
            Ok(AnalysisOutcome::Completed(result)) => {
                self.results = result.users;
                self.message = None;
            }
            Ok(AnalysisOutcome::Cancelled) => {
                self.reset_view();
                self.message = Some(Error::Cancelled.user_message());
                return true;
            }
            Err(e) => {
                self.results.clear();
                self.message = Some(e.user_message());
            }
        }

        self.current_page = 1;
        self.loading = false;
        self.analysis_done = true;
        true
    }

    /// Cancel the active run and return to the main menu.
    ///
    /// Returns `true` if a run was cancelled.
    pub fn cancel(&mut self) -> bool {
        let cancelled = match self.active.take() {
            Some(run) => {
                run.cancel.cancel();
                true
            }
            None => false,
        };
        self.reset_view();
        cancelled
    }

    /// Return to the main menu; not allowed while loading
    pub fn back(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.reset_view();
        true
    }

    /// Switch to the share view
    pub fn share(&mut self) -> Result<&str> {
        if self.loading {
            return Err(Error::AnalysisInProgress);
        }
        self.reset_view();
        self.mode = Mode::Share;
        self.analysis_done = true;
        Ok(self.share_link.insert(SHARE_LINK.to_string()).as_str())
    }

    /// Unfollow stub: produces the message only, the graph is not touched
    pub fn unfollow(&self, fid: Fid) -> String {
        let label = self
            .results
            .iter()
            .find(|u| u.fid == fid)
            .map_or_else(|| fid.to_string(), UserRecord::display_name);
        format!("Unfollow {label}")
    }

    fn reset_view(&mut self) {
        self.mode = Mode::None;
        self.loading = false;
        self.analysis_done = false;
        self.results.clear();
        self.current_page = 1;
        self.share_link = None;
        self.message = None;
    }

    // ========================================================================
    // Paging
    // ========================================================================

    /// Number of list pages; zero when there are no results
    pub fn total_pages(&self) -> usize {
        self.results.len().div_ceil(ITEMS_PER_PAGE)
    }

    /// A previous page exists
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// A next page exists
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Rows on the current page
    pub fn current_items(&self) -> &[UserRecord] {
        let start = self.current_page.saturating_sub(1) * ITEMS_PER_PAGE;
        let end = (start + ITEMS_PER_PAGE).min(self.results.len());
        self.results.get(start..end).unwrap_or(&[])
    }

    /// Advance one page; `false` on the last page
    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Go back one page; `false` on the first page
    pub fn prev_page(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Jump to a page, clamped to the valid range
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages().max(1));
    }

    // ========================================================================
    // Snapshot
    // ========================================================================

    /// Snapshot of the current view
    pub fn snapshot(&self) -> SessionView {
        let title = match self.mode {
            Mode::None => None,
            Mode::Share => Some("Share This Frame".to_string()),
            mode => mode.threshold().map(|t| t.title().to_string()),
        };

        let message = if self.loading {
            Some(LOADING_MESSAGE.to_string())
        } else if self.message.is_some() {
            self.message.clone()
        } else if self.analysis_done && self.results.is_empty() && self.mode != Mode::Share {
            Some(EMPTY_MESSAGE.to_string())
        } else {
            None
        };

        SessionView {
            mode: self.mode,
            title,
            loading: self.loading,
            analysis_done: self.analysis_done,
            page: self.current_page,
            total_pages: self.total_pages(),
            has_prev: self.has_prev(),
            has_next: self.has_next(),
            total_results: self.results.len(),
            items: self.current_items().iter().map(ListItem::from).collect(),
            share_link: self.share_link.clone(),
            message,
        }
    }
}
