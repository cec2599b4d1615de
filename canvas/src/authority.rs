//! Authority gate: admin status, broadcast/follow toggles, admin command builders.
//!
//! A session becomes admin only when the relay grants a submitted key. Every
//! admin-only command goes through a builder here that returns `None` unless
//! the session is authenticated, so callers cannot emit an admin message
//! without passing the gate.

#[cfg(test)]
#[path = "authority_test.rs"]
mod authority_test;

use events::{Annotation, ClientEvent};

use crate::camera::ViewTransform;

/// Admin authentication state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    /// Key sent, waiting for the relay's verdict.
    Pending,
    Authenticated,
}

/// Session authority state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Authority {
    pub state: AuthState,
    /// Last submitted key. Kept across denial and disconnect for re-authorization.
    pub admin_key: Option<String>,
    pub broadcast_enabled: bool,
    pub follow_enabled: bool,
}

impl Authority {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    /// Admin with broadcast on: local annotations are also sent to the room.
    #[must_use]
    pub fn should_broadcast(&self) -> bool {
        self.is_admin() && self.broadcast_enabled
    }

    /// Admin with follow on: local view changes are mirrored to the room.
    #[must_use]
    pub fn should_follow(&self) -> bool {
        self.is_admin() && self.follow_enabled
    }

    // --- Transitions ---

    /// Submit an admin key. Blank input is ignored.
    pub fn request_access(&mut self, key: &str, room: &str) -> Option<ClientEvent> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        self.admin_key = Some(key.to_owned());
        if !self.is_admin() {
            self.state = AuthState::Pending;
        }
        Some(ClientEvent::AdminLogin { room: room.to_owned(), key: key.to_owned() })
    }

    pub fn grant(&mut self) {
        self.state = AuthState::Authenticated;
    }

    /// Revert to unauthenticated. The key is kept so the user can see and retry it.
    pub fn deny(&mut self) {
        self.state = AuthState::Unauthenticated;
    }

    /// Transport lost: drop admin status but keep the key.
    pub fn disconnect(&mut self) {
        self.state = AuthState::Unauthenticated;
    }

    /// Re-send the stored key after a reconnect.
    pub fn reauthorize(&mut self, room: &str) -> Option<ClientEvent> {
        let key = self.admin_key.clone()?;
        self.state = AuthState::Pending;
        Some(ClientEvent::AdminLogin { room: room.to_owned(), key })
    }

    /// Returns whether the toggle was applied.
    pub fn set_broadcast(&mut self, enabled: bool) -> bool {
        if !self.is_admin() {
            return false;
        }
        self.broadcast_enabled = enabled;
        true
    }

    /// Returns whether the toggle was applied.
    pub fn set_follow(&mut self, enabled: bool) -> bool {
        if !self.is_admin() {
            return false;
        }
        self.follow_enabled = enabled;
        true
    }

    // --- Admin command builders ---

    fn admin_key(&self) -> Option<String> {
        if self.is_admin() { self.admin_key.clone() } else { None }
    }

    #[must_use]
    pub fn clear_all(&self, room: &str) -> Option<ClientEvent> {
        let key = self.admin_key()?;
        Some(ClientEvent::AdminClearAll { room: room.to_owned(), key })
    }

    #[must_use]
    pub fn trigger_photo(&self, room: &str) -> Option<ClientEvent> {
        let key = self.admin_key()?;
        Some(ClientEvent::AdminTriggerPhoto { room: room.to_owned(), key })
    }

    #[must_use]
    pub fn return_live(&self, room: &str) -> Option<ClientEvent> {
        let key = self.admin_key()?;
        Some(ClientEvent::AdminReturnLive { room: room.to_owned(), key })
    }

    #[must_use]
    pub fn kick(&self, room: &str, target: &str) -> Option<ClientEvent> {
        let key = self.admin_key()?;
        Some(ClientEvent::KickStudent { room: room.to_owned(), key, target: target.to_owned() })
    }

    #[must_use]
    pub fn broadcast_image(&self, room: &str, image: &str) -> Option<ClientEvent> {
        if !self.is_admin() || image.is_empty() {
            return None;
        }
        Some(ClientEvent::AdminBroadcastImage { room: room.to_owned(), image: image.to_owned() })
    }

    /// Broadcast a finished annotation if broadcast is on.
    #[must_use]
    pub fn broadcast_item(&self, room: &str, item: &Annotation) -> Option<ClientEvent> {
        if !self.should_broadcast() {
            return None;
        }
        Some(ClientEvent::AdminBroadcastStroke { room: room.to_owned(), stroke: item.clone() })
    }

    /// View-sync message if follow is on.
    #[must_use]
    pub fn sync_view(&self, room: &str, view: &ViewTransform) -> Option<ClientEvent> {
        if !self.should_follow() {
            return None;
        }
        Some(ClientEvent::AdminSyncView { room: room.to_owned(), pan_x: view.pan_x, pan_y: view.pan_y, scale: view.scale })
    }
}
