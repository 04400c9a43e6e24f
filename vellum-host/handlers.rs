use vellum_protocol::StyleToken;

/// Callbacks invoked as the bridge decodes events from the embedded
/// editor. At most one handler runs per message; events with no handler
/// registered are dropped.
#[derive(Default)]
pub struct BridgeHandlers {
  pub(crate) on_editor_ready:        Option<Box<dyn FnMut()>>,
  pub(crate) on_editor_change:       Option<Box<dyn FnMut(&str)>>,
  pub(crate) on_content_change:      Option<Box<dyn FnMut()>>,
  pub(crate) on_active_style_change: Option<Box<dyn FnMut(&[StyleToken])>>,
  pub(crate) on_size_change:         Option<Box<dyn FnMut(u32)>>,
  pub(crate) on_edit_position:       Option<Box<dyn FnMut(u32)>>,
  pub(crate) on_focus:               Option<Box<dyn FnMut()>>,
  pub(crate) on_blur:                Option<Box<dyn FnMut()>>,
  pub(crate) on_pasted_image:        Option<Box<dyn FnMut(&str)>>,
}

impl BridgeHandlers {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_on_editor_ready(mut self, handler: impl FnMut() + 'static) -> Self {
    self.on_editor_ready = Some(Box::new(handler));
    self
  }

  pub fn with_on_editor_change(mut self, handler: impl FnMut(&str) + 'static) -> Self {
    self.on_editor_change = Some(Box::new(handler));
    self
  }

  pub fn with_on_content_change(mut self, handler: impl FnMut() + 'static) -> Self {
    self.on_content_change = Some(Box::new(handler));
    self
  }

  pub fn with_on_active_style_change(
    mut self,
    handler: impl FnMut(&[StyleToken]) + 'static,
  ) -> Self {
    self.on_active_style_change = Some(Box::new(handler));
    self
  }

  pub fn with_on_size_change(mut self, handler: impl FnMut(u32) + 'static) -> Self {
    self.on_size_change = Some(Box::new(handler));
    self
  }

  pub fn with_on_edit_position(mut self, handler: impl FnMut(u32) + 'static) -> Self {
    self.on_edit_position = Some(Box::new(handler));
    self
  }

  pub fn with_on_focus(mut self, handler: impl FnMut() + 'static) -> Self {
    self.on_focus = Some(Box::new(handler));
    self
  }

  pub fn with_on_blur(mut self, handler: impl FnMut() + 'static) -> Self {
    self.on_blur = Some(Box::new(handler));
    self
  }

  pub fn with_on_pasted_image(mut self, handler: impl FnMut(&str) + 'static) -> Self {
    self.on_pasted_image = Some(Box::new(handler));
    self
  }
}
