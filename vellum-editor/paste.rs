/// Where a pasted image's bytes live, decided from its source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PastedImageSource {
  /// `http://` or `https://` URL.
  Remote,
  /// Inline `data:image/...;base64` URI.
  DataUri,
  /// `blob:` URL, only resolvable inside the embedded context.
  Blob,
  /// Anything else is treated as a local file path.
  LocalPath,
}

pub fn classify_image_source(src: &str) -> PastedImageSource {
  if src.starts_with("http://") || src.starts_with("https://") {
    return PastedImageSource::Remote;
  }
  if is_data_image_uri(src) {
    return PastedImageSource::DataUri;
  }
  if src.starts_with("blob:") {
    return PastedImageSource::Blob;
  }
  PastedImageSource::LocalPath
}

fn is_data_image_uri(src: &str) -> bool {
  let Some(rest) = src.strip_prefix("data:image/") else {
    return false;
  };
  match rest.find(";base64") {
    Some(position) => position > 0,
    None => false,
  }
}

/// What the clipboard pipeline should do with a pasted image node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteAction {
  /// Keep the node; its source was announced to the host.
  Keep,
  /// Drop the node entirely.
  Discard,
  /// Drop the node and fetch the blob's bytes; the fetch resolves
  /// independently and re-enters the session as a data URI. There is no
  /// cancellation if the editor is torn down mid-fetch.
  Fetch(String),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sources_classify_by_scheme() {
    assert_eq!(
      classify_image_source("https://cdn.example.com/a.png"),
      PastedImageSource::Remote
    );
    assert_eq!(
      classify_image_source("data:image/png;base64,AAAA"),
      PastedImageSource::DataUri
    );
    assert_eq!(
      classify_image_source("blob:https://host/uuid"),
      PastedImageSource::Blob
    );
    assert_eq!(
      classify_image_source("/var/mobile/tmp/a.png"),
      PastedImageSource::LocalPath
    );
  }

  #[test]
  fn data_uris_require_a_subtype_and_base64_marker() {
    assert_eq!(
      classify_image_source("data:image/;base64,AAAA"),
      PastedImageSource::LocalPath
    );
    assert_eq!(
      classify_image_source("data:image/png,plain"),
      PastedImageSource::LocalPath
    );
  }
}
