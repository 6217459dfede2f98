// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Validation, masking, and hashing of sensitive identifiers.
//!
//! Aadhaar numbers are never stored in the clear: only the SHA-256 digest is
//! persisted, alongside a masked display form (`XXXX-XXXX-1234`). PAN numbers
//! are stored raw (matching the upstream policy, see DESIGN.md) with a
//! `******1234` display form. All functions here are pure.

use sha2::{Digest, Sha256};

/// A rejected input field, surfaced to clients as a 422 with the field name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// An Aadhaar number is exactly 12 ASCII digits.
pub fn validate_aadhaar_number(value: &str) -> Result<(), ValidationError> {
    if value.len() == 12 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "aadhaarNumber",
            "must be exactly 12 digits",
        ))
    }
}

/// A PAN matches `[A-Z]{5}[0-9]{4}[A-Z]`.
pub fn validate_pan_number(value: &str) -> Result<(), ValidationError> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[..5].iter().all(|b| b.is_ascii_uppercase())
        && bytes[5..9].iter().all(|b| b.is_ascii_digit())
        && bytes[9].is_ascii_uppercase();
    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::new(
            "panNumber",
            "must match [A-Z]{5}[0-9]{4}[A-Z]",
        ))
    }
}

/// Submitted OTPs are validated for shape only (6 characters); no issued
/// value exists to compare against. See DESIGN.md.
pub fn validate_otp(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() == 6 {
        Ok(())
    } else {
        Err(ValidationError::new("otp", "must be exactly 6 characters"))
    }
}

/// SHA-256 hex digest of an Aadhaar number; this is the only stored form.
pub fn hash_aadhaar(aadhaar_number: &str) -> String {
    let digest = Sha256::digest(aadhaar_number.as_bytes());
    let mut out = String::with_capacity(64);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// Display form of an Aadhaar number: `XXXX-XXXX-` + last 4 digits.
///
/// Callers must validate first; inputs shorter than 4 characters are masked
/// in full.
pub fn mask_aadhaar(aadhaar_number: &str) -> String {
    format!("XXXX-XXXX-{}", last_n(aadhaar_number, 4))
}

/// Display form of a PAN: `******` + last 4 characters.
pub fn mask_pan(pan_number: &str) -> String {
    format!("******{}", last_n(pan_number, 4))
}

fn last_n(value: &str, n: usize) -> &str {
    let start = value.len().saturating_sub(n);
    &value[start..]
}
