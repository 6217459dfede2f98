// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bank Onboarding - Identity Linking & KYC Session Service
//!
//! This crate provides the PAN linking, Aadhaar linking, and KYC onboarding
//! REST surfaces behind one parameterized status lifecycle and one embedded
//! ACID store.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer-token authentication (HS256 JWT)
//! - `lifecycle` - Link-request status machine
//! - `masking` - Identifier validation, masking, and hashing
//! - `storage` - Embedded persistence (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod masking;
pub mod models;
pub mod state;
pub mod storage;
