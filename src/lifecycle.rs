// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Link-request status lifecycle.
//!
//! One linear machine shared by the PAN and Aadhaar linking flows:
//!
//! ```text
//! PENDING_OTP → OTP_SENT → OTP_VERIFIED → LINKED
//! ```
//!
//! `send-otp` and `verify-otp` assign their target status unconditionally
//! (matching the upstream gateway behavior); only `finalize` is guarded.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status of a link request. Moves forward only; `Linked` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkStatus {
    PendingOtp,
    OtpSent,
    OtpVerified,
    Linked,
}

impl LinkStatus {
    /// Status assigned to every freshly created link request.
    pub fn initial() -> Self {
        LinkStatus::PendingOtp
    }

    /// Wire representation, as stored and returned to clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::PendingOtp => "PENDING_OTP",
            LinkStatus::OtpSent => "OTP_SENT",
            LinkStatus::OtpVerified => "OTP_VERIFIED",
            LinkStatus::Linked => "LINKED",
        }
    }
}

impl std::fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle step requested by a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    SendOtp,
    VerifyOtp,
    Finalize,
}

/// Error raised when a guarded transition is attempted out of order.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("OTP must be verified before finalizing link (current status: {current})")]
    OtpNotVerified { current: LinkStatus },
}

impl Transition {
    /// Compute the status after applying this transition to `current`.
    ///
    /// `Finalize` requires `current == OtpVerified`; the other transitions
    /// assign their target status regardless of the current one.
    pub fn apply(self, current: LinkStatus) -> Result<LinkStatus, LifecycleError> {
        match self {
            Transition::SendOtp => Ok(LinkStatus::OtpSent),
            Transition::VerifyOtp => Ok(LinkStatus::OtpVerified),
            Transition::Finalize => {
                if current == LinkStatus::OtpVerified {
                    Ok(LinkStatus::Linked)
                } else {
                    Err(LifecycleError::OtpNotVerified { current })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_walks_all_four_states() {
        let mut status = LinkStatus::initial();
        assert_eq!(status, LinkStatus::PendingOtp);

        status = Transition::SendOtp.apply(status).unwrap();
        assert_eq!(status, LinkStatus::OtpSent);

        status = Transition::VerifyOtp.apply(status).unwrap();
        assert_eq!(status, LinkStatus::OtpVerified);

        status = Transition::Finalize.apply(status).unwrap();
        assert_eq!(status, LinkStatus::Linked);
    }

    #[test]
    fn finalize_rejected_unless_otp_verified() {
        for current in [
            LinkStatus::PendingOtp,
            LinkStatus::OtpSent,
            LinkStatus::Linked,
        ] {
            let err = Transition::Finalize.apply(current).unwrap_err();
            assert_eq!(err, LifecycleError::OtpNotVerified { current });
        }
    }

    #[test]
    fn send_and_verify_are_unconditional() {
        // Upstream applies no guard here, so even a LINKED request can be
        // pushed back through the OTP steps.
        for current in [
            LinkStatus::PendingOtp,
            LinkStatus::OtpSent,
            LinkStatus::OtpVerified,
            LinkStatus::Linked,
        ] {
            assert_eq!(
                Transition::SendOtp.apply(current).unwrap(),
                LinkStatus::OtpSent
            );
            assert_eq!(
                Transition::VerifyOtp.apply(current).unwrap(),
                LinkStatus::OtpVerified
            );
        }
    }

    #[test]
    fn status_serializes_to_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&LinkStatus::PendingOtp).unwrap(),
            r#""PENDING_OTP""#
        );
        assert_eq!(
            serde_json::to_string(&LinkStatus::Linked).unwrap(),
            r#""LINKED""#
        );
        let parsed: LinkStatus = serde_json::from_str(r#""OTP_VERIFIED""#).unwrap();
        assert_eq!(parsed, LinkStatus::OtpVerified);
    }
}
