use std::time::{
  Duration,
  Instant,
};

use base64::{
  Engine as _,
  engine::general_purpose::STANDARD as BASE64,
};
use vellum_event::TimerQueue;
use vellum_protocol::{
  CommandCall,
  CommandName,
  Event,
  LinkPayload,
  StyleToken,
};

use crate::{
  BridgeConfig,
  BridgeHandlers,
};

/// How often a command held back by readiness gating re-checks for
/// delivery. There is no timeout: delivery is bounded only by the embedded
/// side eventually reporting ready.
pub const READY_RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// The embedding surface's script evaluation hook.
///
/// Delivery is fire-and-forget: no return value is observed and a failed
/// evaluation is not surfaced to the caller.
pub trait ScriptSink {
  fn inject(&mut self, script: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
  NotReady,
  Ready,
}

/// Host side of the command/event channel.
///
/// Commands issued before the embedded editor reports ready are parked
/// under their command name, last write wins; there is no backlog. The
/// owner pumps retries by calling [`HostBridge::tick`].
pub struct HostBridge<S> {
  sink:         S,
  config:       BridgeConfig,
  handlers:     BridgeHandlers,
  lifecycle:    Lifecycle,
  pending:      TimerQueue<CommandName, CommandCall>,
  editor_state: String,
}

impl<S: ScriptSink> HostBridge<S> {
  pub fn new(sink: S, config: BridgeConfig, handlers: BridgeHandlers) -> Self {
    Self {
      sink,
      config,
      handlers,
      lifecycle: Lifecycle::NotReady,
      pending: TimerQueue::new(),
      editor_state: String::new(),
    }
  }

  pub fn is_ready(&self) -> bool {
    self.lifecycle == Lifecycle::Ready
  }

  /// The last document HTML reported by the embedded editor.
  pub fn editor_state(&self) -> &str {
    &self.editor_state
  }

  /// Deliver `call` now, or park it until the embedded side is ready.
  /// Re-issuing a command under the same name replaces the parked entry.
  pub fn send_command(&mut self, call: CommandCall, now: Instant) {
    if self.is_ready() {
      self.pending.cancel(&call.name);
      self.deliver(&call);
    } else {
      self
        .pending
        .schedule(call.name, now + READY_RETRY_INTERVAL, call);
    }
  }

  /// Pump the readiness retry queue.
  pub fn tick(&mut self, now: Instant) {
    if self.pending.is_empty() {
      return;
    }
    for (name, call) in self.pending.poll(now) {
      if self.is_ready() {
        self.deliver(&call);
      } else {
        self.pending.schedule(name, now + READY_RETRY_INTERVAL, call);
      }
    }
  }

  /// Earliest pending retry, for owners that sleep between pumps.
  pub fn next_deadline(&self) -> Option<Instant> {
    self.pending.next_deadline()
  }

  /// Decode one raw message from the embedded side.
  ///
  /// Malformed payloads and unknown event types are dropped whole; this
  /// never panics across the boundary. Each recognized event invokes at
  /// most one registered handler.
  pub fn on_message(&mut self, raw: &str, now: Instant) {
    let event = match Event::from_json(raw) {
      Ok(event) => event,
      Err(err) => {
        log::debug!("dropping unrecognized editor message: {err}");
        return;
      },
    };
    match event {
      Event::IsMounted(_) => self.mark_ready(now),
      Event::EditorChange(html) => {
        self.editor_state = html;
        if let Some(handler) = self.handlers.on_editor_change.as_mut() {
          handler(&self.editor_state);
        }
      },
      Event::ContentChange(_) => {
        if let Some(handler) = self.handlers.on_content_change.as_mut() {
          handler();
        }
      },
      Event::ActiveStyleChange(styles) => {
        if let Some(handler) = self.handlers.on_active_style_change.as_mut() {
          handler(&styles);
        }
      },
      Event::SizeChange(height) => {
        if let Some(handler) = self.handlers.on_size_change.as_mut() {
          handler(height);
        }
      },
      Event::EditPosition(position) => {
        if let Some(handler) = self.handlers.on_edit_position.as_mut() {
          handler(position);
        }
      },
      Event::OnFocus(_) => {
        if let Some(handler) = self.handlers.on_focus.as_mut() {
          handler();
        }
      },
      Event::OnBlur(_) => {
        if let Some(handler) = self.handlers.on_blur.as_mut() {
          handler();
        }
      },
      Event::OnPastedImage(src) => {
        if let Some(handler) = self.handlers.on_pasted_image.as_mut() {
          handler(&src);
        }
      },
    }
  }

  fn mark_ready(&mut self, now: Instant) {
    if self.is_ready() {
      // The seed sequence runs exactly once per session.
      return;
    }
    self.lifecycle = Lifecycle::Ready;
    self.apply_defaults(now);
    if let Some(handler) = self.handlers.on_editor_ready.as_mut() {
      handler();
    }
  }

  /// Seed the freshly mounted editor, in fixed order: content, container
  /// style, placeholder, dark mode, font size. Dark mode is always sent;
  /// the rest only when configured.
  fn apply_defaults(&mut self, now: Instant) {
    if let Some(html) = self.config.default_value.clone() {
      self.send_command(
        CommandCall::with_arg(CommandName::SetDefaultValue, BASE64.encode(html.as_bytes())),
        now,
      );
    }
    let style_json = self.config.content_style.as_ref().and_then(|style| {
      serde_json::to_string(style)
        .inspect_err(|err| log::warn!("failed to serialize container style: {err}"))
        .ok()
    });
    if let Some(json) = style_json {
      self.send_command(CommandCall::with_arg(CommandName::SetStyle, json), now);
    }
    if let Some(placeholder) = self.config.placeholder.clone() {
      self.send_command(
        CommandCall::with_arg(CommandName::SetEditorPlaceholder, placeholder),
        now,
      );
    }
    let is_dark_mode = self.config.is_dark_mode;
    self.send_command(
      CommandCall::with_arg(CommandName::SetIsDarkMode, bool_arg(is_dark_mode)),
      now,
    );
    if let Some(size) = self.config.default_font_size {
      self.send_command(
        CommandCall::with_arg(CommandName::SetFontSize, size.to_string()),
        now,
      );
    }
  }

  fn deliver(&mut self, call: &CommandCall) {
    self.sink.inject(&call.to_script());
  }

  pub fn format(&mut self, token: &StyleToken, now: Instant) {
    self.send_command(
      CommandCall::with_arg(CommandName::Format, token.to_string()),
      now,
    );
  }

  pub fn add_image(&mut self, src: &str, now: Instant) {
    self.send_command(CommandCall::with_arg(CommandName::AddImage, src), now);
  }

  pub fn add_link(&mut self, link: &LinkPayload, now: Instant) {
    match serde_json::to_string(link) {
      Ok(json) => self.send_command(CommandCall::with_arg(CommandName::AddLink, json), now),
      Err(err) => log::warn!("failed to serialize link payload: {err}"),
    }
  }

  pub fn focus(&mut self, now: Instant) {
    self.send_command(CommandCall::new(CommandName::FocusTextEditor), now);
  }

  pub fn blur(&mut self, now: Instant) {
    self.send_command(CommandCall::new(CommandName::BlurTextEditor), now);
  }

  pub fn set_placeholder(&mut self, placeholder: &str, now: Instant) {
    self.config.placeholder = Some(placeholder.to_string());
    if self.is_ready() {
      self.send_command(
        CommandCall::with_arg(CommandName::SetEditorPlaceholder, placeholder),
        now,
      );
    }
  }

  pub fn disable_image_input(&mut self, disable: bool, now: Instant) {
    self.send_command(
      CommandCall::with_arg(CommandName::DisableInputImage, bool_arg(disable)),
      now,
    );
  }

  pub fn set_disable_padding(&mut self, disable: bool, now: Instant) {
    self.send_command(
      CommandCall::with_arg(CommandName::SetDisablePadding, bool_arg(disable)),
      now,
    );
  }

  /// Change-driven setter: before readiness this only updates the seed
  /// config, afterwards it re-sends when the value actually changed.
  pub fn set_dark_mode(&mut self, is_dark_mode: bool, now: Instant) {
    if !self.is_ready() {
      self.config.is_dark_mode = is_dark_mode;
      return;
    }
    if self.config.is_dark_mode == is_dark_mode {
      return;
    }
    self.config.is_dark_mode = is_dark_mode;
    self.send_command(
      CommandCall::with_arg(CommandName::SetIsDarkMode, bool_arg(is_dark_mode)),
      now,
    );
  }

  pub fn set_font_size(&mut self, size: u32, now: Instant) {
    if !self.is_ready() {
      self.config.default_font_size = Some(size);
      return;
    }
    if self.config.default_font_size == Some(size) {
      return;
    }
    self.config.default_font_size = Some(size);
    self.send_command(
      CommandCall::with_arg(CommandName::SetFontSize, size.to_string()),
      now,
    );
  }

  pub fn set_default_value(&mut self, html: &str, now: Instant) {
    if !self.is_ready() {
      self.config.default_value = Some(html.to_string());
      return;
    }
    if html.is_empty() || self.config.default_value.as_deref() == Some(html) {
      return;
    }
    self.config.default_value = Some(html.to_string());
    self.send_command(
      CommandCall::with_arg(CommandName::SetDefaultValue, BASE64.encode(html.as_bytes())),
      now,
    );
  }
}

fn bool_arg(value: bool) -> &'static str {
  if value { "true" } else { "false" }
}
