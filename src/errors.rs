//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of ZiSynth.
//! The ZiSynth project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # ZiSynth Error Module
//!
//! This module defines the error types used throughout ZiSynth for consistent
//! error handling and reporting.
//!
//! ## Error Categories
//!
//! - **TemplateSyntax**: A template contains a placeholder without a closing
//!   delimiter or with an invalid name. Fatal for the sample being rendered.
//! - **EmptyPool**: Filter constraints selected no identity record, or the
//!   pool itself is empty. Callers may retry with relaxed constraints.
//! - **Validation**: Invalid configuration or inputs (ratios, empty template lists)
//! - **Io / Csv / Serde**: Loading and persistence failures
//! - **Internal**: Unexpected internal failures
//!
//! Missing attributes are not errors: the renderer substitutes an empty string
//! and emits a `log::warn!` diagnostic instead.

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout ZiSynth.
pub type Result<T> = std::result::Result<T, ZiError>;

/// Canonical error enumeration for ZiSynth.
#[derive(Debug, Error, Serialize, Deserialize, PartialEq)]
pub enum ZiError {
    /// A placeholder opened at `position` (character offset) is malformed.
    #[error("template syntax error at position {position}: {reason} in '{template}'")]
    TemplateSyntax {
        template: String,
        position: usize,
        reason: String,
    },

    /// No identity record is available to draw from.
    #[error("empty pool: {message}")]
    EmptyPool { message: String },

    /// Validation errors triggered by invalid parameters or inputs.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Errors raised while parsing CSV input.
    #[error("csv error: {0}")]
    Csv(String),

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for ZiError {
    fn from(err: io::Error) -> Self {
        ZiError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ZiError {
    fn from(err: serde_json::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for ZiError {
    fn from(err: serde_yaml::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for ZiError {
    fn from(err: csv::Error) -> Self {
        ZiError::Csv(err.to_string())
    }
}

impl ZiError {
    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        ZiError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct empty pool errors.
    pub fn empty_pool<T: Into<String>>(message: T) -> Self {
        ZiError::EmptyPool {
            message: message.into(),
        }
    }

    /// Helper to construct template syntax errors.
    pub fn template_syntax(
        template: impl Into<String>,
        position: usize,
        reason: impl Into<String>,
    ) -> Self {
        ZiError::TemplateSyntax {
            template: template.into(),
            position,
            reason: reason.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        ZiError::Internal(message.into())
    }
}
