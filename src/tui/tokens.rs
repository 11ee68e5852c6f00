//! In-memory API token list backing the demo screen

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Permission level of an API token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiTokenLevel {
    #[default]
    ReadOnly,
    Operator,
    ReadWrite,
    ReadWriteCommandOnDevice,
    Admin,
}

impl ApiTokenLevel {
    pub const ALL: [ApiTokenLevel; 5] = [
        Self::ReadOnly,
        Self::Operator,
        Self::ReadWrite,
        Self::ReadWriteCommandOnDevice,
        Self::Admin,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::ReadOnly => "Read only",
            Self::Operator => "Operator",
            Self::ReadWrite => "Read-write",
            Self::ReadWriteCommandOnDevice => "Read-write & commands on devices",
            Self::Admin => "Administrator",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|level| *level == self).unwrap_or(0)
    }

    /// Next level, wrapping around
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous level, wrapping around
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiToken {
    pub id: Uuid,
    pub description: String,
    pub level: ApiTokenLevel,
    pub created_at: DateTime<Utc>,
}

impl ApiToken {
    pub fn new(description: impl Into<String>, level: ApiTokenLevel) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            level,
            created_at: Utc::now(),
        }
    }
}

/// Token list with a selection cursor
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    tokens: Vec<ApiToken>,
    selected: usize,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A few tokens so the demo has something to remove
    pub fn with_samples() -> Self {
        let mut store = Self::new();
        store.push(ApiToken::new("Backup automation", ApiTokenLevel::ReadOnly));
        store.push(ApiToken::new("Inventory sync", ApiTokenLevel::ReadWrite));
        store.push(ApiToken::new("Ops console", ApiTokenLevel::Admin));
        store
    }

    pub fn push(&mut self, token: ApiToken) {
        self.tokens.push(token);
    }

    pub fn remove(&mut self, id: Uuid) -> Option<ApiToken> {
        let index = self.tokens.iter().position(|token| token.id == id)?;
        let token = self.tokens.remove(index);
        if self.selected >= self.tokens.len() {
            self.selected = self.tokens.len().saturating_sub(1);
        }
        Some(token)
    }

    pub fn tokens(&self) -> &[ApiToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&ApiToken> {
        self.tokens.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.tokens.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}
