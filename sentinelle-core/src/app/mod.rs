//! src/app/mod.rs
//!
//! Explicit state machine over the application's named screens. Every
//! transition is a pure function of the current state and one event, and
//! store mutations come back to the shell as [`Effect`]s instead of being
//! performed inline.

use serde::{Deserialize, Serialize};

use sentinelle_common::models::report::WasteReport;

/// The navigable screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    Home,
    Camera,
    Processing,
    Analysis,
    Portfolio,
    Detail,
    Chat,
    About,
    Support,
    Admin,
}

/// One navigation or completion event fed into the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// Begin a fresh capture (home or portfolio button).
    StartCapture,
    /// Begin a follow-up capture for an existing report.
    StartFollowUp { report_id: String },
    /// The camera produced an image.
    CaptureTaken,
    /// The user backed out of the camera or the processing wait.
    CancelCapture,
    /// A new-capture analysis finished.
    AnalysisReady,
    /// A follow-up assessment finished.
    EvolutionReady,
    /// The analysis call failed; the processing screen offers a retry.
    AnalysisFailed,
    /// The user confirmed the pending analysis into a report.
    ConfirmReport,
    /// The user walked away from the pending analysis.
    DiscardAnalysis,
    OpenPortfolio,
    OpenDetail { report_id: String },
    OpenChat,
    OpenAbout,
    OpenSupport,
    /// Request the PIN gate for the admin dashboard.
    RequestAdmin,
    AdminPinAccepted,
    AdminPinDismissed,
    /// Delete the report currently shown in detail.
    DeleteReport,
    Back,
    Logout,
}

/// Side effects the shell must run after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the full capture analysis on the image just taken.
    BeginAnalysis,
    /// Run the comparative assessment against this report's first image.
    BeginEvolutionAnalysis { report_id: String },
    /// Confirm the pending report into the store.
    ConfirmPending,
    /// Commit the finished follow-up assessment to this report.
    AppendEvolution { report_id: String },
    /// Delete this report from the store.
    DeleteReport { report_id: String },
    /// End the active session.
    ResetSession,
}

/// Follow-up policy: the presentation layer refuses a new follow-up once
/// the current status is resolved. The store itself never forbids it.
pub fn can_follow_up(report: &WasteReport) -> bool {
    !report.is_resolved()
}

/// The screen flow. Tracks which screen is visible, which report (if any)
/// a capture is updating, and which report the detail screen shows.
#[derive(Debug, Clone)]
pub struct ScreenFlow {
    screen: Screen,
    /// Report id a follow-up capture is updating; `None` for new captures.
    updating: Option<String>,
    /// Report id the detail screen is showing.
    selected: Option<String>,
    pin_gate_open: bool,
}

impl ScreenFlow {
    pub fn new() -> Self {
        Self {
            screen: Screen::Home,
            updating: None,
            selected: None,
            pin_gate_open: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn updating(&self) -> Option<&str> {
        self.updating.as_deref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn pin_gate_open(&self) -> bool {
        self.pin_gate_open
    }

    /// Apply one event. Returns the effect the shell must run, if any.
    ///
    /// Completion events (`AnalysisReady`, `EvolutionReady`) only act while
    /// the processing screen is still visible: a result that arrives after
    /// the user navigated away is discarded by screen identity.
    pub fn handle(&mut self, event: FlowEvent) -> Option<Effect> {
        use FlowEvent::*;

        match event {
            StartCapture => {
                self.updating = None;
                self.screen = Screen::Camera;
                None
            }
            StartFollowUp { report_id } => {
                self.updating = Some(report_id);
                self.screen = Screen::Camera;
                None
            }
            CaptureTaken => {
                if self.screen != Screen::Camera {
                    return None;
                }
                self.screen = Screen::Processing;
                match &self.updating {
                    Some(id) => Some(Effect::BeginEvolutionAnalysis {
                        report_id: id.clone(),
                    }),
                    None => Some(Effect::BeginAnalysis),
                }
            }
            CancelCapture => {
                self.screen = if self.updating.take().is_some() {
                    Screen::Detail
                } else {
                    Screen::Home
                };
                None
            }
            AnalysisReady => {
                // Stale results after navigation are dropped here.
                if self.screen != Screen::Processing || self.updating.is_some() {
                    return None;
                }
                self.screen = Screen::Analysis;
                None
            }
            EvolutionReady => {
                if self.screen != Screen::Processing {
                    return None;
                }
                let Some(id) = self.updating.take() else {
                    return None;
                };
                self.screen = Screen::Detail;
                Some(Effect::AppendEvolution { report_id: id })
            }
            AnalysisFailed => {
                // Stay on the processing screen; it owns the retry button.
                None
            }
            ConfirmReport => {
                if self.screen != Screen::Analysis {
                    return None;
                }
                self.screen = Screen::Portfolio;
                Some(Effect::ConfirmPending)
            }
            DiscardAnalysis => {
                if self.screen != Screen::Analysis {
                    return None;
                }
                self.screen = Screen::Home;
                None
            }
            OpenPortfolio => {
                self.screen = Screen::Portfolio;
                None
            }
            OpenDetail { report_id } => {
                self.selected = Some(report_id);
                self.screen = Screen::Detail;
                None
            }
            OpenChat => {
                self.screen = Screen::Chat;
                None
            }
            OpenAbout => {
                self.screen = Screen::About;
                None
            }
            OpenSupport => {
                self.screen = Screen::Support;
                None
            }
            RequestAdmin => {
                self.pin_gate_open = true;
                None
            }
            AdminPinAccepted => {
                if !self.pin_gate_open {
                    return None;
                }
                self.pin_gate_open = false;
                self.screen = Screen::Admin;
                None
            }
            AdminPinDismissed => {
                self.pin_gate_open = false;
                None
            }
            DeleteReport => {
                if self.screen != Screen::Detail {
                    return None;
                }
                let id = self.selected.take()?;
                self.screen = Screen::Portfolio;
                Some(Effect::DeleteReport { report_id: id })
            }
            Back => {
                self.screen = match self.screen {
                    Screen::Detail => Screen::Portfolio,
                    Screen::Camera | Screen::Processing => {
                        if self.updating.take().is_some() {
                            Screen::Detail
                        } else {
                            Screen::Home
                        }
                    }
                    _ => Screen::Home,
                };
                None
            }
            Logout => {
                self.updating = None;
                self.selected = None;
                self.screen = Screen::Home;
                Some(Effect::ResetSession)
            }
        }
    }
}

impl Default for ScreenFlow {
    fn default() -> Self {
        Self::new()
    }
}
