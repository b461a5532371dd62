// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! Conversation history persistence.

pub mod store;

pub use store::{HistoryStore, Turn};
