// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub subject: String,
    pub issuer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(UserInfo),
    SignedOut,
}

/// Session collaborator consulted before any list screen is built.
pub trait Authenticator {
    fn is_authenticated(&self) -> bool;
    fn login(&mut self) -> Result<AuthEvent>;
    fn logout(&mut self) -> AuthEvent;
    fn user_info(&self) -> Option<&UserInfo>;
    fn bearer_token(&self) -> Option<&str>;
}

/// Signs in from a bearer token supplied by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StaticTokenAuth {
    token: Option<String>,
    issuer: Option<String>,
    client_id: Option<String>,
    user: Option<UserInfo>,
}

impl StaticTokenAuth {
    pub fn new(token: Option<String>, issuer: Option<String>, client_id: Option<String>) -> Self {
        let token = token.filter(|token| !token.trim().is_empty());
        Self {
            token,
            issuer,
            client_id,
            user: None,
        }
    }
}

impl Authenticator for StaticTokenAuth {
    fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    fn login(&mut self) -> Result<AuthEvent> {
        if self.token.is_none() {
            bail!(
                "no API token configured -- set [auth] token in the config file or DEPOT_API_TOKEN"
            );
        }
        let user = UserInfo {
            subject: self
                .client_id
                .clone()
                .unwrap_or_else(|| "depot".to_owned()),
            issuer: self.issuer.clone(),
        };
        debug!(subject = %user.subject, "signed in with static token");
        self.user = Some(user.clone());
        Ok(AuthEvent::SignedIn(user))
    }

    fn logout(&mut self) -> AuthEvent {
        self.user = None;
        AuthEvent::SignedOut
    }

    fn user_info(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    fn bearer_token(&self) -> Option<&str> {
        if self.is_authenticated() {
            self.token.as_deref()
        } else {
            None
        }
    }
}

/// Signs in when needed; fails if no session can be established.
pub fn require_authenticated(auth: &mut dyn Authenticator) -> Result<()> {
    if auth.is_authenticated() {
        return Ok(());
    }
    auth.login()?;
    Ok(())
}
