use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateDecision {
    Loading,
    ShowScreen,
    ShowLogin,
    RedirectToLogin,
    RedirectToHome,
}

/// Session signals the history screen is gated on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub is_loaded: bool,
    pub is_signed_in: bool,
    pub bypass: bool,
}

impl AuthState {
    pub fn new(is_loaded: bool, is_signed_in: bool) -> Self {
        Self {
            is_loaded,
            is_signed_in,
            bypass: false,
        }
    }

    /// Guest mode: skip authentication entirely
    pub fn enable_bypass(&mut self) {
        self.bypass = true;
    }

    /// Leaves guest mode if active, otherwise ends the signed-in session
    pub fn sign_out(&mut self) {
        if self.bypass {
            self.bypass = false;
        } else {
            self.is_signed_in = false;
        }
    }

    pub fn can_view_history(&self) -> bool {
        self.is_loaded && (self.is_signed_in || self.bypass)
    }

    /// Where the client should be, given whether it is currently on the login surface
    pub fn decide(&self, in_auth_group: bool) -> GateDecision {
        if !self.is_loaded {
            return GateDecision::Loading;
        }

        match (self.can_view_history(), in_auth_group) {
            (true, false) => GateDecision::ShowScreen,
            (true, true) if self.is_signed_in => GateDecision::RedirectToHome,
            // A guest may still open the login surface to sign in properly
            (true, true) => GateDecision::ShowLogin,
            (false, false) => GateDecision::RedirectToLogin,
            (false, true) => GateDecision::ShowLogin,
        }
    }
}
