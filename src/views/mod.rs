//! Client-side view state for the integration pages.
//!
//! Each view is a plain state object. Local edits go through an `update`
//! function; API-backed actions are async methods that take the client
//! explicitly. Nothing here is process-wide.

use std::fmt;

pub mod integration_list;
pub mod provider_form;

pub use integration_list::{IntegrationListView, ListState};
pub use provider_form::{
    FnbField, FnbForm, FormMsg, ProviderFields, ProviderForm, XeroField, XeroForm,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// Banner shown above a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Error => "error",
            NoticeKind::Info => "info",
        };
        write!(f, "[{tag}] {}", self.text)
    }
}
