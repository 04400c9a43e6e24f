use indexmap::IndexMap;
use serde_json::Value;

/// Seed state applied to the embedded editor exactly once, when it first
/// reports ready. Until then the bridge only records the latest values.
#[derive(Debug, Clone, Default)]
pub struct BridgeConfig {
  pub(crate) default_value:     Option<String>,
  pub(crate) content_style:     Option<IndexMap<String, Value>>,
  pub(crate) placeholder:       Option<String>,
  pub(crate) is_dark_mode:      bool,
  pub(crate) default_font_size: Option<u32>,
}

impl BridgeConfig {
  pub fn new() -> Self {
    Self::default()
  }

  /// Initial document HTML. Encoded as base64 on delivery.
  pub fn with_default_value(mut self, html: impl Into<String>) -> Self {
    self.default_value = Some(html.into());
    self
  }

  /// CSS-like key/value map applied to the editor container.
  pub fn with_content_style(mut self, style: IndexMap<String, Value>) -> Self {
    self.content_style = Some(style);
    self
  }

  pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
    self.placeholder = Some(placeholder.into());
    self
  }

  pub fn with_dark_mode(mut self, is_dark_mode: bool) -> Self {
    self.is_dark_mode = is_dark_mode;
    self
  }

  pub fn with_font_size(mut self, size: u32) -> Self {
    self.default_font_size = Some(size);
    self
  }

  pub fn default_value(&self) -> Option<&str> {
    self.default_value.as_deref()
  }

  pub fn content_style(&self) -> Option<&IndexMap<String, Value>> {
    self.content_style.as_ref()
  }

  pub fn placeholder(&self) -> Option<&str> {
    self.placeholder.as_deref()
  }

  pub fn is_dark_mode(&self) -> bool {
    self.is_dark_mode
  }

  pub fn default_font_size(&self) -> Option<u32> {
    self.default_font_size
  }
}
