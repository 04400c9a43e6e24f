use std::{
  fmt,
  str::FromStr,
};

use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;

/// Every command the host may deliver to the embedded editor.
///
/// The wire spelling is the name of the function invoked inside the
/// embedded context. Keeping this a closed enum means the handler table is
/// validated at compile time instead of at string-lookup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
  Format,
  AddImage,
  AddLink,
  SetDefaultValue,
  SetStyle,
  SetIsDarkMode,
  SetFontSize,
  SetEditorPlaceholder,
  FocusTextEditor,
  BlurTextEditor,
  DisableInputImage,
  SetDisablePadding,
}

impl CommandName {
  pub const ALL: [CommandName; 12] = [
    CommandName::Format,
    CommandName::AddImage,
    CommandName::AddLink,
    CommandName::SetDefaultValue,
    CommandName::SetStyle,
    CommandName::SetIsDarkMode,
    CommandName::SetFontSize,
    CommandName::SetEditorPlaceholder,
    CommandName::FocusTextEditor,
    CommandName::BlurTextEditor,
    CommandName::DisableInputImage,
    CommandName::SetDisablePadding,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      CommandName::Format => "format",
      CommandName::AddImage => "addImage",
      CommandName::AddLink => "addLink",
      CommandName::SetDefaultValue => "setDefaultValue",
      CommandName::SetStyle => "setStyle",
      CommandName::SetIsDarkMode => "setIsDarkMode",
      CommandName::SetFontSize => "setFontSize",
      CommandName::SetEditorPlaceholder => "setEditorPlaceholder",
      CommandName::FocusTextEditor => "focusTextEditor",
      CommandName::BlurTextEditor => "blurTextEditor",
      CommandName::DisableInputImage => "disableInputImage",
      CommandName::SetDisablePadding => "setDisablePadding",
    }
  }
}

impl fmt::Display for CommandName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for CommandName {
  type Err = ParseCommandError;

  fn from_str(raw: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|name| name.as_str() == raw)
      .ok_or_else(|| ParseCommandError(raw.to_string()))
  }
}

/// A command invocation: a name plus at most one string argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCall {
  pub name: CommandName,
  pub arg:  Option<String>,
}

impl CommandCall {
  pub fn new(name: CommandName) -> Self {
    Self { name, arg: None }
  }

  pub fn with_arg(name: CommandName, arg: impl Into<String>) -> Self {
    Self {
      name,
      arg: Some(arg.into()),
    }
  }

  /// Render the guarded invocation the host injects into the embedded
  /// context. The guard makes delivery a no-op rather than an error while
  /// the editor is still wiring up its entry points, and the trailing
  /// `true` keeps the evaluation result serializable.
  pub fn to_script(&self) -> String {
    let name = self.name.as_str();
    match &self.arg {
      Some(arg) => format!(
        "window.{name} && window.{name}('{}');true;",
        escape_script_arg(arg)
      ),
      None => format!("window.{name} && window.{name}();true;"),
    }
  }
}

fn escape_script_arg(arg: &str) -> String {
  let mut escaped = String::with_capacity(arg.len());
  for ch in arg.chars() {
    match ch {
      '\\' => escaped.push_str("\\\\"),
      '\'' => escaped.push_str("\\'"),
      '\n' => escaped.push_str("\\n"),
      '\r' => escaped.push_str("\\r"),
      other => escaped.push(other),
    }
  }
  escaped
}

/// JSON body of the `addLink` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPayload {
  pub text: String,
  pub url:  String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command name: {0}")]
pub struct ParseCommandError(pub String);
