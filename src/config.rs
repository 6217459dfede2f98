// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Directory holding the embedded database file | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET_KEY` | HS256 secret for issued bearer tokens | dev fallback |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable name for the data directory path.
///
/// The embedded redb database lives at `<DATA_DIR>/onboarding.redb`.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Default data directory when `DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// File name of the embedded database inside the data directory.
pub const DB_FILE_NAME: &str = "onboarding.redb";

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the JWT signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET_KEY";

/// Development fallback secret, matching the upstream default.
/// Deployments must override it via `JWT_SECRET_KEY`.
pub const DEFAULT_JWT_SECRET: &str = "bank-fixed-secret-key";

/// Environment variable name selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
