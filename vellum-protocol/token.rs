use std::{
  fmt,
  str::FromStr,
};

use serde::{
  Deserialize,
  Deserializer,
  Serialize,
  Serializer,
  de,
};
use thiserror::Error;

/// Sentinel token that removes all inline formatting in the selection.
pub const CLEAR_TOKEN: &str = "CLEAR";

/// Indent levels are clamped to `0..=MAX_INDENT`.
pub const MAX_INDENT: i64 = 8;

/// Every inline format name the engine knows about, in resolution order.
/// Clearing a collapsed selection touches exactly this set.
pub const ALL_INLINE_FORMATS: [&str; 9] = [
  "bold",
  "italic",
  "strike",
  "underline",
  "background",
  "link",
  "color",
  "font",
  "size",
];

/// Boolean-toggled inline styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseInline {
  Bold,
  Italic,
  Strikethrough,
  Underline,
}

impl BaseInline {
  pub const ALL: [BaseInline; 4] = [
    BaseInline::Bold,
    BaseInline::Italic,
    BaseInline::Strikethrough,
    BaseInline::Underline,
  ];

  /// The token spelling, e.g. `"Strikethrough"`.
  pub fn token_name(self) -> &'static str {
    match self {
      BaseInline::Bold => "Bold",
      BaseInline::Italic => "Italic",
      BaseInline::Strikethrough => "Strikethrough",
      BaseInline::Underline => "Underline",
    }
  }

  /// The engine-side format name, e.g. `"strike"`.
  pub fn format_name(self) -> &'static str {
    match self {
      BaseInline::Bold => "bold",
      BaseInline::Italic => "italic",
      BaseInline::Strikethrough => "strike",
      BaseInline::Underline => "underline",
    }
  }

  pub fn from_format_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|kind| kind.format_name() == name)
  }
}

/// Valued inline styles with toggle-by-equality semantics: setting the
/// currently active value clears it, setting a different value replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialInline {
  BackgroundColor,
  Link,
}

impl SpecialInline {
  pub const ALL: [SpecialInline; 2] = [SpecialInline::BackgroundColor, SpecialInline::Link];

  pub fn token_prefix(self) -> &'static str {
    match self {
      SpecialInline::BackgroundColor => "BackgroundColor",
      SpecialInline::Link => "Link",
    }
  }

  pub fn format_name(self) -> &'static str {
    match self {
      SpecialInline::BackgroundColor => "background",
      SpecialInline::Link => "link",
    }
  }

  pub fn from_format_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|kind| kind.format_name() == name)
  }
}

/// Valued inline styles that always set and never toggle off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKeepInline {
  Color,
  Font,
  Size,
}

impl SpecialKeepInline {
  pub const ALL: [SpecialKeepInline; 3] = [
    SpecialKeepInline::Color,
    SpecialKeepInline::Font,
    SpecialKeepInline::Size,
  ];

  pub fn token_prefix(self) -> &'static str {
    match self {
      SpecialKeepInline::Color => "Color",
      SpecialKeepInline::Font => "Font",
      SpecialKeepInline::Size => "Size",
    }
  }

  pub fn format_name(self) -> &'static str {
    match self {
      SpecialKeepInline::Color => "color",
      SpecialKeepInline::Font => "font",
      SpecialKeepInline::Size => "size",
    }
  }

  pub fn from_format_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|kind| kind.format_name() == name)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
  Bullet,
  Ordered,
}

impl ListKind {
  /// The engine-side `list` format value.
  pub fn format_value(self) -> &'static str {
    match self {
      ListKind::Bullet => "bullet",
      ListKind::Ordered => "ordered",
    }
  }
}

/// Block-level tokens. Each maps to exactly one primitive operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockStyle {
  IndentIncrease,
  IndentDecrease,
  UnorderedList,
  OrderedList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOperation {
  /// Indent delta before direction handling and clamping.
  Indent(i64),
  List(ListKind),
}

impl BlockStyle {
  pub const ALL: [BlockStyle; 4] = [
    BlockStyle::IndentIncrease,
    BlockStyle::IndentDecrease,
    BlockStyle::UnorderedList,
    BlockStyle::OrderedList,
  ];

  pub fn token_name(self) -> &'static str {
    match self {
      BlockStyle::IndentIncrease => "IndentIncrease",
      BlockStyle::IndentDecrease => "IndentDecrease",
      BlockStyle::UnorderedList => "UnorderedList",
      BlockStyle::OrderedList => "OrderedList",
    }
  }

  pub fn operation(self) -> BlockOperation {
    match self {
      BlockStyle::IndentIncrease => BlockOperation::Indent(1),
      BlockStyle::IndentDecrease => BlockOperation::Indent(-1),
      BlockStyle::UnorderedList => BlockOperation::List(ListKind::Bullet),
      BlockStyle::OrderedList => BlockOperation::List(ListKind::Ordered),
    }
  }
}

/// A symbolic style token as it appears on the wire.
///
/// Parsing runs Clear -> base inline exact match -> block exact match ->
/// keep-inline prefix match -> toggle-inline prefix match; the first match
/// wins and a token performs at most one operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StyleToken {
  Clear,
  Base(BaseInline),
  Block(BlockStyle),
  Keep(SpecialKeepInline, String),
  Toggle(SpecialInline, String),
}

impl FromStr for StyleToken {
  type Err = ParseTokenError;

  fn from_str(raw: &str) -> Result<Self, Self::Err> {
    if raw == CLEAR_TOKEN {
      return Ok(StyleToken::Clear);
    }
    for kind in BaseInline::ALL {
      if raw == kind.token_name() {
        return Ok(StyleToken::Base(kind));
      }
    }
    for kind in BlockStyle::ALL {
      if raw == kind.token_name() {
        return Ok(StyleToken::Block(kind));
      }
    }
    for kind in SpecialKeepInline::ALL {
      if let Some(value) = split_token_value(raw, kind.token_prefix()) {
        return Ok(StyleToken::Keep(kind, value.to_string()));
      }
    }
    for kind in SpecialInline::ALL {
      if let Some(value) = split_token_value(raw, kind.token_prefix()) {
        return Ok(StyleToken::Toggle(kind, value.to_string()));
      }
    }
    Err(ParseTokenError(raw.to_string()))
  }
}

fn split_token_value<'a>(raw: &'a str, prefix: &str) -> Option<&'a str> {
  raw.strip_prefix(prefix)?.strip_prefix('-')
}

impl fmt::Display for StyleToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StyleToken::Clear => f.write_str(CLEAR_TOKEN),
      StyleToken::Base(kind) => f.write_str(kind.token_name()),
      StyleToken::Block(kind) => f.write_str(kind.token_name()),
      StyleToken::Keep(kind, value) => write!(f, "{}-{}", kind.token_prefix(), value),
      StyleToken::Toggle(kind, value) => write!(f, "{}-{}", kind.token_prefix(), value),
    }
  }
}

impl Serialize for StyleToken {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for StyleToken {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(de::Error::custom)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown style token: {0}")]
pub struct ParseTokenError(pub String);
