//! Session configuration and the partial options merged over it.

use crate::constants::dialog as defaults;
use crate::error::AppError;
use crate::surface::{SurfaceHandle, SurfaceSpec};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Where the session message is placed relative to the header region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HeaderText {
    /// No header. The message becomes the sole content.
    Hidden,
    /// The header shows the message itself and the body stays hidden.
    #[default]
    FromMessage,
    /// The header shows this text and the message becomes body content.
    Text(String),
}

impl HeaderText {
    /// Whether the layout renders a header region at all
    pub fn has_header(&self) -> bool {
        !matches!(self, HeaderText::Hidden)
    }
}

impl From<bool> for HeaderText {
    fn from(show: bool) -> Self {
        if show {
            HeaderText::FromMessage
        } else {
            HeaderText::Hidden
        }
    }
}

impl From<&str> for HeaderText {
    fn from(text: &str) -> Self {
        if text.is_empty() {
            HeaderText::FromMessage
        } else {
            HeaderText::Text(text.to_string())
        }
    }
}

impl From<String> for HeaderText {
    fn from(text: String) -> Self {
        if text.is_empty() {
            HeaderText::FromMessage
        } else {
            HeaderText::Text(text)
        }
    }
}

impl Serialize for HeaderText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            HeaderText::Hidden => serializer.serialize_bool(false),
            HeaderText::FromMessage => serializer.serialize_str(""),
            HeaderText::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for HeaderText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Flag(flag) => HeaderText::from(flag),
            Raw::Text(text) => HeaderText::from(text),
        })
    }
}

/// Heading rank (1-6) of the header region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeaderRank(u8);

impl HeaderRank {
    pub fn new(rank: u8) -> Result<Self, AppError> {
        if (1..=defaults::MAX_HEADER_SIZE).contains(&rank) {
            Ok(Self(rank))
        } else {
            Err(AppError::invalid_argument(format!(
                "header size must be between 1 and {}, got {rank}",
                defaults::MAX_HEADER_SIZE
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for HeaderRank {
    fn default() -> Self {
        Self(defaults::HEADER_SIZE)
    }
}

impl TryFrom<u8> for HeaderRank {
    type Error = AppError;

    fn try_from(rank: u8) -> Result<Self, Self::Error> {
        HeaderRank::new(rank)
    }
}

impl From<HeaderRank> for u8 {
    fn from(rank: HeaderRank) -> Self {
        rank.0
    }
}

/// Callback fired once when a session becomes hidden.
#[derive(Clone)]
pub struct OnHide(Arc<dyn Fn(SurfaceHandle) + Send + Sync>);

impl OnHide {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(SurfaceHandle) + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    pub(crate) fn call(&self, handle: SurfaceHandle) {
        (self.0)(handle)
    }
}

impl fmt::Debug for OnHide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OnHide(..)")
    }
}

/// Partial session options. Unset fields fall back to the controller defaults.
///
/// The same structure backs the `[dialog]` table of the config file, so every
/// field except the callback is serializable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_text: Option<HeaderText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_size: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialog_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_element: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtl: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_animations_on_close: Option<bool>,
    #[serde(skip)]
    pub on_hide: Option<OnHide>,
}

/// Milliseconds for the `*_ms` fields, rounded up so a non-zero duration never becomes zero.
fn whole_millis(duration: Duration) -> u64 {
    let millis = duration.as_nanos().div_ceil(1_000_000);
    u64::try_from(millis).unwrap_or(u64::MAX)
}

impl DialogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header_text(mut self, header_text: impl Into<HeaderText>) -> Self {
        self.header_text = Some(header_text.into());
        self
    }

    pub fn with_header_size(mut self, rank: u8) -> Self {
        self.header_size = Some(rank);
        self
    }

    pub fn with_header_class(mut self, class: impl Into<String>) -> Self {
        self.header_class = Some(class.into());
        self
    }

    pub fn with_dialog_size(mut self, size: impl Into<String>) -> Self {
        self.dialog_size = Some(size.into());
        self
    }

    pub fn with_progress_type(mut self, progress_type: impl Into<String>) -> Self {
        self.progress_type = Some(progress_type.into());
        self
    }

    pub fn with_content_element(mut self, element: impl Into<String>) -> Self {
        self.content_element = Some(element.into());
        self
    }

    pub fn with_content_class(mut self, class: impl Into<String>) -> Self {
        self.content_class = Some(class.into());
        self
    }

    pub fn with_rtl(mut self, rtl: bool) -> Self {
        self.rtl = Some(rtl);
        self
    }

    pub fn with_timer(mut self, cadence: Duration) -> Self {
        self.timer_ms = Some(whole_millis(cadence));
        self
    }

    pub fn with_timeout(mut self, delay: Duration) -> Self {
        self.timeout_ms = Some(whole_millis(delay));
        self
    }

    pub fn with_stop_animations_on_close(mut self, stop: bool) -> Self {
        self.stop_animations_on_close = Some(stop);
        self
    }

    pub fn with_on_hide<F>(mut self, callback: F) -> Self
    where
        F: Fn(SurfaceHandle) + Send + Sync + 'static,
    {
        self.on_hide = Some(OnHide::new(callback));
        self
    }

    /// Returns a copy where every field set in `other` replaces ours.
    pub fn overlay(&self, other: &DialogOptions) -> DialogOptions {
        DialogOptions {
            header_text: other.header_text.clone().or_else(|| self.header_text.clone()),
            header_size: other.header_size.or(self.header_size),
            header_class: other.header_class.clone().or_else(|| self.header_class.clone()),
            dialog_size: other.dialog_size.clone().or_else(|| self.dialog_size.clone()),
            progress_type: other.progress_type.clone().or_else(|| self.progress_type.clone()),
            content_element: other
                .content_element
                .clone()
                .or_else(|| self.content_element.clone()),
            content_class: other.content_class.clone().or_else(|| self.content_class.clone()),
            rtl: other.rtl.or(self.rtl),
            timer_ms: other.timer_ms.or(self.timer_ms),
            timeout_ms: other.timeout_ms.or(self.timeout_ms),
            stop_animations_on_close: other
                .stop_animations_on_close
                .or(self.stop_animations_on_close),
            on_hide: other.on_hide.clone().or_else(|| self.on_hide.clone()),
        }
    }
}

/// Fully resolved configuration of one session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub header_text: HeaderText,
    pub header_size: HeaderRank,
    pub header_class: String,
    pub dialog_size: String,
    pub progress_type: String,
    pub content_element: String,
    pub content_class: String,
    pub rtl: bool,
    /// Default cadence of cycling jobs
    pub timer: Duration,
    /// Default delay before the first cycling tick
    pub timeout: Duration,
    pub stop_animations_on_close: bool,
    pub on_hide: Option<OnHide>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            header_text: HeaderText::FromMessage,
            header_size: HeaderRank::default(),
            header_class: String::new(),
            dialog_size: defaults::DIALOG_SIZE.to_string(),
            progress_type: String::new(),
            content_element: defaults::CONTENT_ELEMENT.to_string(),
            content_class: defaults::CONTENT_CLASS.to_string(),
            rtl: defaults::RTL,
            timer: Duration::from_millis(defaults::TIMER_MS),
            timeout: Duration::from_millis(defaults::TIMEOUT_MS),
            stop_animations_on_close: true,
            on_hide: None,
        }
    }
}

impl SessionConfig {
    /// Merges `options` over this configuration.
    ///
    /// # Errors
    /// * `AppError::InvalidArgument` - header size outside 1-6, zero timer,
    ///   or empty dialog size / content element
    pub fn merged(&self, options: &DialogOptions) -> Result<Self, AppError> {
        let header_size = match options.header_size {
            Some(rank) => HeaderRank::new(rank)?,
            None => self.header_size,
        };

        let config = Self {
            header_text: options
                .header_text
                .clone()
                .unwrap_or_else(|| self.header_text.clone()),
            header_size,
            header_class: options
                .header_class
                .clone()
                .unwrap_or_else(|| self.header_class.clone()),
            dialog_size: options
                .dialog_size
                .clone()
                .unwrap_or_else(|| self.dialog_size.clone()),
            progress_type: options
                .progress_type
                .clone()
                .unwrap_or_else(|| self.progress_type.clone()),
            content_element: options
                .content_element
                .clone()
                .unwrap_or_else(|| self.content_element.clone()),
            content_class: options
                .content_class
                .clone()
                .unwrap_or_else(|| self.content_class.clone()),
            rtl: options.rtl.unwrap_or(self.rtl),
            timer: options
                .timer_ms
                .map(Duration::from_millis)
                .unwrap_or(self.timer),
            timeout: options
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(self.timeout),
            stop_animations_on_close: options
                .stop_animations_on_close
                .unwrap_or(self.stop_animations_on_close),
            on_hide: options.on_hide.clone().or_else(|| self.on_hide.clone()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.timer.is_zero() {
            return Err(AppError::invalid_argument(
                "animation timer must be greater than zero",
            ));
        }

        if self.dialog_size.trim().is_empty() {
            return Err(AppError::invalid_argument("dialog size cannot be empty"));
        }

        if self.content_element.trim().is_empty()
            || !self
                .content_element
                .chars()
                .all(|c| c.is_ascii_alphanumeric())
        {
            return Err(AppError::invalid_argument(format!(
                "content element '{}' is not a valid element name",
                self.content_element
            )));
        }

        Ok(())
    }

    /// Presentational settings handed to the render surface.
    pub(crate) fn surface_spec(&self) -> SurfaceSpec {
        SurfaceSpec {
            dialog_size: self.dialog_size.clone(),
            progress_type: self.progress_type.clone(),
            rtl: self.rtl,
            header_rank: self.header_size,
            header_class: self.header_class.clone(),
            content_element: self.content_element.clone(),
            content_class: self.content_class.clone(),
        }
    }
}
