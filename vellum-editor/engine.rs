use indexmap::IndexMap;
use serde_json::Value;

use crate::kinds::EmbedNode;

/// A cursor (zero length) or range selection in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
  pub index:  usize,
  pub length: usize,
}

impl Selection {
  pub fn cursor(index: usize) -> Self {
    Self { index, length: 0 }
  }

  pub fn range(index: usize, length: usize) -> Self {
    Self { index, length }
  }

  pub fn is_collapsed(&self) -> bool {
    self.length == 0
  }
}

/// Formats active over a selection, keyed by engine format name. Values
/// are whatever the engine reports: booleans for toggles, strings or
/// numbers for valued formats, `"rtl"` under the `direction` key.
pub type FormatSnapshot = IndexMap<String, Value>;

/// Signals the engine raises toward the session as the user works.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineSignal {
  TextChanged,
  SelectionChanged,
  FocusGained,
  FocusLost,
  /// An inserted image finished loading, which changes the document
  /// height after the fact. Also raised for images inside table and
  /// blockquote embeds.
  ImageLoaded,
}

/// The delta/selection-based rich-text engine this core drives.
///
/// The engine is an external collaborator; this trait is the whole seam.
/// All geometry is reported in pixels.
pub trait EditorEngine {
  fn selection(&self) -> Option<Selection>;

  /// Formats over `range`, or at the caret when `range` is `None`.
  fn formats(&self, range: Option<Selection>) -> FormatSnapshot;

  /// Set one format. A `false` value clears the format.
  fn apply_format(&mut self, name: &str, value: Value);

  /// Remove every format, inline and block, over `range`.
  fn remove_formats(&mut self, range: Selection);

  fn delete_text(&mut self, range: Selection);

  fn insert_embed(&mut self, index: usize, node: EmbedNode);

  fn insert_text(&mut self, index: usize, text: &str, formats: &FormatSnapshot);

  /// Replace the whole document.
  fn replace_html(&mut self, html: &str);

  fn html(&self) -> String;

  fn set_placeholder(&mut self, placeholder: &str);

  fn focus(&mut self);

  fn blur(&mut self);

  /// Overall document scroll height.
  fn document_height(&self) -> u32;

  /// Bottom edge of the caret's bounding rectangle. Empty lines may
  /// report nothing here.
  fn caret_bottom(&self) -> Option<u32>;

  /// Bottom edge of the focused node's bounding rectangle, the fallback
  /// lookup for empty lines.
  fn focused_node_bottom(&self) -> Option<u32>;
}
