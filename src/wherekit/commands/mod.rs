use crate::config::WherekitConfig;
use crate::model::Palette;
use crate::request::FetchRequest;

pub mod add;
pub mod clear;
pub mod config;
pub mod count;
pub mod delete;
pub mod explain;
pub mod list;
pub mod selection;

pub use selection::{Listing, Preset, Selection, SortField};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_palettes: Vec<Palette>,
    pub listed_palettes: Vec<Palette>,
    pub count: Option<usize>,
    pub request: Option<FetchRequest>,
    pub config: Option<WherekitConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_messages(mut self, messages: Vec<CmdMessage>) -> Self {
        self.messages.extend(messages);
        self
    }

    pub fn with_affected_palettes(mut self, palettes: Vec<Palette>) -> Self {
        self.affected_palettes = palettes;
        self
    }

    pub fn with_listed_palettes(mut self, palettes: Vec<Palette>) -> Self {
        self.listed_palettes = palettes;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_request(mut self, request: FetchRequest) -> Self {
        self.request = Some(request);
        self
    }

    pub fn with_config(mut self, config: WherekitConfig) -> Self {
        self.config = Some(config);
        self
    }
}
