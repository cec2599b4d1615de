//! Remote sync adapter: applies inbound room events and throttles outbound view sync.
//!
//! Inbound events are applied in arrival order with no authority check on
//! annotations; the relay only fans them out from admins. Outbound view sync
//! is coalesced by [`ViewSyncThrottle`] so a drag or a burst of wheel notches
//! produces at most one message per interval, always carrying the latest view.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use events::ServerEvent;

use crate::camera::{ViewTransform, clamp_scale};
use crate::engine::{Action, ConnectionStatus, EngineCore, LeaveReason, Notice};
use crate::input::InputState;

/// What the layer under the annotations shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// The host's live feed.
    #[default]
    Live,
    /// A frozen image broadcast by an admin (data URL).
    StaticImage(String),
}

/// Rate limiter for outbound `admin_sync_view`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSyncThrottle {
    interval_ms: f64,
    last_sent_ms: Option<f64>,
    pending: Option<ViewTransform>,
}

impl ViewSyncThrottle {
    #[must_use]
    pub fn new(interval_ms: f64) -> Self {
        Self { interval_ms: interval_ms.max(0.0), last_sent_ms: None, pending: None }
    }

    fn due(&self, now_ms: f64) -> bool {
        match self.last_sent_ms {
            None => true,
            // A clock that went backwards counts as due.
            Some(last) => now_ms < last || now_ms - last >= self.interval_ms,
        }
    }

    /// Offer the latest view. Returns it if a message may go out now;
    /// otherwise keeps it pending, replacing any older pending view.
    pub fn offer(&mut self, view: ViewTransform, now_ms: f64) -> Option<ViewTransform> {
        if self.due(now_ms) {
            self.last_sent_ms = Some(now_ms);
            self.pending = None;
            Some(view)
        } else {
            self.pending = Some(view);
            None
        }
    }

    /// Release the pending view if the interval has elapsed.
    pub fn flush(&mut self, now_ms: f64) -> Option<ViewTransform> {
        if self.pending.is_none() || !self.due(now_ms) {
            return None;
        }
        self.last_sent_ms = Some(now_ms);
        self.pending.take()
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Forget timing and any pending view.
    pub fn reset(&mut self) {
        self.last_sent_ms = None;
        self.pending = None;
    }
}

impl Default for ViewSyncThrottle {
    fn default() -> Self {
        Self::new(crate::consts::SYNC_VIEW_INTERVAL_MS)
    }
}

impl EngineCore {
    /// Apply one inbound relay event.
    pub fn apply_server_event(&mut self, event: ServerEvent) -> Vec<Action> {
        match event {
            ServerEvent::Welcome { sid } => {
                log::debug!("assigned participant id {sid}");
                self.local_id = Some(sid);
                vec![]
            }
            ServerEvent::HostWaiting => self.set_status(ConnectionStatus::WaitingForHost),
            ServerEvent::RosterUpdate(roster) => {
                self.roster = roster;
                vec![Action::RosterChanged]
            }
            ServerEvent::AdminAccessGranted => {
                log::info!("admin access granted");
                self.authority.grant();
                vec![Action::Notice(Notice::AccessGranted)]
            }
            ServerEvent::AdminAccessDenied => {
                log::info!("admin access denied");
                self.authority.deny();
                vec![Action::Notice(Notice::AccessDenied)]
            }
            ServerEvent::Kicked => self.leave(LeaveReason::Kicked),
            ServerEvent::SessionEnded => self.leave(LeaveReason::SessionEnded),
            ServerEvent::JoinError { message } => {
                log::warn!("join rejected: {message}");
                let mut actions = vec![Action::Notice(Notice::JoinError(message))];
                actions.extend(self.leave(LeaveReason::JoinError));
                actions
            }
            ServerEvent::ReceiveBroadcastStroke { stroke } => {
                self.doc.append(stroke);
                self.redraw()
            }
            ServerEvent::ReceiveClearCommand => {
                if matches!(self.input, InputState::Drawing { .. }) {
                    self.input = InputState::Idle;
                }
                self.doc.clear();
                self.redraw()
            }
            ServerEvent::ReceiveBroadcastImage { image } => {
                self.view_mode = ViewMode::StaticImage(image.clone());
                vec![Action::ShowImage(image)]
            }
            ServerEvent::ReturnToLive => {
                self.view_mode = ViewMode::Live;
                vec![Action::ShowLive]
            }
            ServerEvent::SyncViewCommand { pan_x, pan_y, scale } => {
                let mut view = ViewTransform::new(pan_x, pan_y, clamp_scale(scale));
                view.clamp_pan(&self.viewport);
                self.camera = view;
                vec![self.transform_action()]
            }
            ServerEvent::Offer { .. } => {
                let mut actions = self.set_status(ConnectionStatus::Negotiating);
                actions.push(Action::Media(event));
                actions
            }
            ServerEvent::IceCandidate { .. } => vec![Action::Media(event)],
            ServerEvent::RoomCreated { .. }
            | ServerEvent::ViewerJoined { .. }
            | ServerEvent::ViewerLeft { .. }
            | ServerEvent::TakePhoto
            | ServerEvent::Answer { .. } => {
                log::debug!("ignoring host-only event {}", event.name());
                vec![]
            }
        }
    }

    fn leave(&mut self, reason: LeaveReason) -> Vec<Action> {
        log::info!("leaving session: {reason:?}");
        self.input = InputState::Idle;
        self.sync.reset();
        let mut actions = self.set_status(ConnectionStatus::Ended);
        actions.push(Action::Leave(reason));
        actions
    }
}
