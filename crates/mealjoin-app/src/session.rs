// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Explicit end-user and admin sessions. Both are mock logins; nothing here
//! is a security boundary.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::Role;
use crate::forms::{LoginInput, SignInInput};

pub const ADMIN_EMAIL: &str = "admin@mealjoin.com";
pub const ADMIN_PASSWORD: &str = "admin123";

const MOCK_COOK_NAME: &str = "Kevin Asante";
const MOCK_DINER_NAME: &str = "Ama Serwaa";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSession {
    user: Option<SessionUser>,
}

impl UserSession {
    pub fn signed_in(user: SessionUser) -> Self {
        Self { user: Some(user) }
    }

    /// Accepts any validated credentials and returns the new user.
    pub fn login(&mut self, input: &SignInInput) -> &SessionUser {
        let name = match input.role {
            Role::Cook => MOCK_COOK_NAME,
            Role::Diner => MOCK_DINER_NAME,
        };
        info!(role = input.role.as_str(), "user signed in");
        self.user.insert(SessionUser {
            name: name.to_owned(),
            email: input.email.clone(),
            role: input.role,
        })
    }

    pub fn logout(&mut self) {
        self.user = None;
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_cook(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| user.role == Role::Cook)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminSession {
    email: Option<String>,
}

impl AdminSession {
    pub fn login(&mut self, input: &LoginInput) -> Result<()> {
        if input.email != ADMIN_EMAIL || input.password != ADMIN_PASSWORD {
            bail!("Invalid email or password");
        }
        info!("admin signed in");
        self.email = Some(input.email.clone());
        Ok(())
    }

    pub fn logout(&mut self) {
        self.email = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.email.is_some()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
