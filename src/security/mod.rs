// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! Input validation and at-rest secret handling.

pub mod secrets;
pub mod validation;

pub use secrets::SecretStore;
pub use validation::ValidationError;
