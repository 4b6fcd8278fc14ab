// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::CollectionKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Suspend,
    Activate,
    Delete,
    Deactivate,
    Resolve,
    Reply { body: String },
}

impl ActionKind {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Suspend => "suspend",
            Self::Activate => "activate",
            Self::Delete => "delete",
            Self::Deactivate => "deactivate",
            Self::Resolve => "resolve",
            Self::Reply { .. } => "reply",
        }
    }

    pub const fn applies_to(&self, kind: CollectionKind) -> bool {
        matches!(
            (self, kind),
            (Self::Suspend | Self::Activate, CollectionKind::Users)
                | (Self::Delete | Self::Deactivate, CollectionKind::Sessions)
                | (Self::Resolve, CollectionKind::Reports)
                | (Self::Reply { .. }, CollectionKind::Conversations)
        )
    }

    /// Replies are sent straight away; everything else waits for a yes.
    pub const fn requires_confirmation(&self) -> bool {
        !matches!(self, Self::Reply { .. })
    }

    pub const fn success_notice(&self) -> &'static str {
        match self {
            Self::Suspend => "User suspended successfully",
            Self::Activate => "User activated successfully",
            Self::Delete => "Session deleted successfully",
            Self::Deactivate => "Session deactivated successfully",
            Self::Resolve => "Report marked as resolved",
            Self::Reply { .. } => "Message sent",
        }
    }

    pub const fn failure_notice(&self) -> &'static str {
        match self {
            Self::Suspend => "Failed to suspend user",
            Self::Activate => "Failed to activate user",
            Self::Delete => "Failed to delete session",
            Self::Deactivate => "Failed to deactivate session",
            Self::Resolve => "Failed to resolve report",
            Self::Reply { .. } => "Failed to send message",
        }
    }

    pub fn prompt(&self, target_label: &str) -> String {
        match self {
            Self::Reply { .. } => format!("Send message to {target_label}?"),
            Self::Resolve => format!("Mark report \"{target_label}\" as resolved?"),
            other => {
                let verb = other.label();
                let mut chars = verb.chars();
                let capitalized = match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                };
                format!("{capitalized} \"{target_label}\"?")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest<Id> {
    pub request_id: u64,
    pub target_id: Id,
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ActionPhase<Id> {
    Idle,
    Pending(ActionRequest<Id>),
    Running(ActionRequest<Id>),
}

/// Confirm-then-mutate state for one screen. A request only reaches the
/// supplier through [`ActionFlow::confirm`].
#[derive(Debug, Clone)]
pub struct ActionFlow<Id> {
    phase: ActionPhase<Id>,
    next_request_id: u64,
}

impl<Id> Default for ActionFlow<Id> {
    fn default() -> Self {
        Self {
            phase: ActionPhase::Idle,
            next_request_id: 0,
        }
    }
}

impl<Id: Copy + Eq + std::fmt::Debug> ActionFlow<Id> {
    pub fn request(&mut self, target_id: Id, kind: ActionKind) -> Result<&ActionRequest<Id>> {
        if let ActionPhase::Running(running) = &self.phase {
            bail!(
                "a {} action is still running -- wait for it to finish",
                running.kind.label()
            );
        }
        self.next_request_id = self.next_request_id.saturating_add(1);
        if self.next_request_id == 0 {
            self.next_request_id = 1;
        }
        self.phase = ActionPhase::Pending(ActionRequest {
            request_id: self.next_request_id,
            target_id,
            kind,
        });
        match &self.phase {
            ActionPhase::Pending(request) => Ok(request),
            _ => bail!("action request was not recorded"),
        }
    }

    pub fn pending(&self) -> Option<&ActionRequest<Id>> {
        match &self.phase {
            ActionPhase::Pending(request) => Some(request),
            _ => None,
        }
    }

    pub fn running(&self) -> Option<&ActionRequest<Id>> {
        match &self.phase {
            ActionPhase::Running(request) => Some(request),
            _ => None,
        }
    }

    /// Drops a pending request. A running mutation cannot be cancelled.
    pub fn cancel(&mut self) -> Option<ActionRequest<Id>> {
        match std::mem::replace(&mut self.phase, ActionPhase::Idle) {
            ActionPhase::Pending(request) => Some(request),
            other => {
                self.phase = other;
                None
            }
        }
    }

    pub fn confirm(&mut self) -> Result<ActionRequest<Id>> {
        match std::mem::replace(&mut self.phase, ActionPhase::Idle) {
            ActionPhase::Pending(request) => {
                self.phase = ActionPhase::Running(request.clone());
                Ok(request)
            }
            ActionPhase::Running(request) => {
                let label = request.kind.label();
                self.phase = ActionPhase::Running(request);
                bail!("a {label} action is already running")
            }
            ActionPhase::Idle => bail!("nothing to confirm -- select a row and choose an action"),
        }
    }

    /// Completes the running request if `request_id` matches it.
    pub fn finish(&mut self, request_id: u64) -> Option<ActionRequest<Id>> {
        let current = matches!(
            &self.phase,
            ActionPhase::Running(request) if request.request_id == request_id
        );
        if !current {
            return None;
        }
        match std::mem::replace(&mut self.phase, ActionPhase::Idle) {
            ActionPhase::Running(request) => Some(request),
            _ => None,
        }
    }
}
