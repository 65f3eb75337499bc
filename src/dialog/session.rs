//! The live session and the read-only view handed to callers.

use super::options::{HeaderText, OnHide, SessionConfig};
use crate::surface::SurfaceHandle;

/// Initial content of the header and body regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Placement {
    /// `None` when the layout has no header region
    pub header: Option<String>,
    /// `None` when the body starts hidden
    pub body: Option<String>,
}

impl Placement {
    pub(crate) fn for_message(message: &str, header_text: &HeaderText) -> Self {
        match header_text {
            HeaderText::Hidden => Placement {
                header: None,
                body: Some(message.to_string()),
            },
            HeaderText::Text(title) => Placement {
                header: Some(title.clone()),
                body: Some(message.to_string()),
            },
            HeaderText::FromMessage => Placement {
                header: Some(message.to_string()),
                body: None,
            },
        }
    }
}

#[derive(Debug)]
pub(crate) struct Session {
    pub message: String,
    pub config: SessionConfig,
    pub handle: SurfaceHandle,
    pub visible: bool,
    pub progress: u8,
    /// `None` when the layout has no header region
    pub header: Option<String>,
    pub header_visible: bool,
    pub body: String,
    pub body_visible: bool,
    on_hide: Option<OnHide>,
}

impl Session {
    pub(crate) fn new(
        message: String,
        config: SessionConfig,
        handle: SurfaceHandle,
        placement: Placement,
    ) -> Self {
        let on_hide = config.on_hide.clone();
        Self {
            message,
            handle,
            visible: true,
            progress: 0,
            header_visible: placement.header.is_some(),
            header: placement.header,
            body_visible: placement.body.is_some(),
            body: placement.body.unwrap_or_default(),
            config,
            on_hide,
        }
    }

    /// Marks the session hidden. Returns the hide callback the first time.
    pub(crate) fn mark_hidden(&mut self) -> Option<OnHide> {
        self.visible = false;
        self.on_hide.take()
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            handle: self.handle,
            message: self.message.clone(),
            visible: self.visible,
            progress: self.progress,
            header: self.header.clone(),
            header_visible: self.header_visible,
            body: self.body.clone(),
            body_visible: self.body_visible,
            config: self.config.clone(),
        }
    }
}

/// Copy of the session state at one point in time.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub handle: SurfaceHandle,
    /// Message passed to `show`
    pub message: String,
    pub visible: bool,
    pub progress: u8,
    /// Header text, `None` when the layout has no header region
    pub header: Option<String>,
    pub header_visible: bool,
    pub body: String,
    pub body_visible: bool,
    pub config: SessionConfig,
}
