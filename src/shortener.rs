use crate::{codegen, db::UrlStore, error::ShortenError, models::ShortLink};
use url::Url;

/// Accept only absolute URLs with a host, e.g. `https://example.com/path`.
///
/// `Url::parse` drops embedded tabs and newlines, but the raw input is what
/// gets stored and later sent as `Location`, so control characters are
/// rejected up front.
pub fn validate_url(input: &str) -> bool {
    if input.chars().any(|c| c.is_ascii_control()) {
        return false;
    }

    Url::parse(input)
        .map(|url| url.has_host())
        .unwrap_or(false)
}

/// Derive and persist the short code for `url`, returning the row it is
/// stored under.
///
/// A URL stored earlier keeps its original code even if `length` has changed
/// since. Codes are never rehashed: if the derived code already belongs to
/// another URL the call fails with [`ShortenError::Collision`].
pub async fn shorten(
    store: &UrlStore,
    url: &str,
    length: usize,
) -> Result<ShortLink, ShortenError> {
    let code = codegen::generate(url, length);
    store.put(&code, url).await?;

    match store.find_by_url(url).await? {
        Some(link) => {
            if link.code != code {
                tracing::debug!(
                    "{} already stored under '{}', derived '{}' not used",
                    link.original_url,
                    link.code,
                    code
                );
            }
            Ok(link)
        }
        None => {
            tracing::warn!("Short code collision on '{}' for {}", code, url);
            Err(ShortenError::Collision { code })
        }
    }
}
