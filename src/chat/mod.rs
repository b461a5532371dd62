// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! Chat turn orchestration.

pub mod session;

pub use session::ChatSession;
