// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! Configuration schema, persistence, and the startup audit.

pub mod settings;
pub mod store;
pub mod validation;

pub use settings::Settings;
pub use store::{chatapi_home, ConfigStore};
