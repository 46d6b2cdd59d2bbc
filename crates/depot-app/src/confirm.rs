// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Modal yes/no gate in front of a destructive action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog<A> {
    pending: Option<A>,
}

impl<A> Default for ConfirmDialog<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A> ConfirmDialog<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any action already waiting.
    pub fn request(&mut self, action: A) {
        self.pending = Some(action);
    }

    pub fn confirm(&mut self) -> Option<A> {
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&A> {
        self.pending.as_ref()
    }
}
