use std::borrow::Cow;

use percent_encoding::percent_decode_str;

use crate::licensing_error::LicensingError;

/// Characters whose escapes are kept when decoding a full uri
const RESERVED: &[u8] = b";/?:@&=+$,#";

/// `https://x/post/index.html` becomes `https://x/post/`
pub fn strip_index_html(url: &str) -> &str {
    if url.ends_with("/index.html") {
        &url[..url.len() - "index.html".len()]
    } else {
        url
    }
}

/// Decode percent escapes in a full uri, escapes of reserved characters stay as they are.
///
/// Escapes that are not followed by two hex digits are left untouched.
pub fn decode_uri(uri: &str) -> Result<Cow<'_, str>, LicensingError> {
    if !uri.contains('%') {
        return Ok(Cow::Borrowed(uri));
    }

    let bytes = uri.as_bytes();
    let mut decoded = String::with_capacity(uri.len());
    let mut start = 0;
    let mut i = 0;
    while i + 2 < bytes.len() {
        if bytes[i] == b'%'
            && let Some(byte) = hex_byte(bytes[i + 1], bytes[i + 2])
            && RESERVED.contains(&byte)
        {
            decoded.push_str(&percent_decode_str(&uri[start..i]).decode_utf8()?);
            decoded.push_str(&uri[i..i + 3]);
            i += 3;
            start = i;
            continue;
        }
        i += 1;
    }
    decoded.push_str(&percent_decode_str(&uri[start..]).decode_utf8()?);

    Ok(Cow::Owned(decoded))
}

fn hex_byte(high: u8, low: u8) -> Option<u8> {
    let high = (high as char).to_digit(16)?;
    let low = (low as char).to_digit(16)?;
    Some((high * 16 + low) as u8)
}

/// Strip a trailing `index.html` and decode the result
pub fn pretty_permalink(permalink: &str) -> Result<String, LicensingError> {
    Ok(decode_uri(strip_index_html(permalink))?.into_owned())
}

#[cfg(test)]
mod tests {
    use crate::licensing_error::LicensingErrorKind;

    use super::*;

    #[test]
    fn strips_index_html() {
        assert_eq!(strip_index_html("https://x/post/index.html"), "https://x/post/");
        assert_eq!(
            strip_index_html("https://x/post/page2.html"),
            "https://x/post/page2.html"
        );
        assert_eq!(strip_index_html("https://x/postindex.html"), "https://x/postindex.html");
        assert_eq!(strip_index_html("/index.html"), "/");
    }

    #[test]
    fn decodes_unreserved_escapes() {
        assert_eq!(
            decode_uri("https://example.com/%E4%BD%A0%E5%A5%BD/hello%20world/").unwrap(),
            "https://example.com/你好/hello world/"
        );
        assert_eq!(decode_uri("https://example.com/").unwrap(), "https://example.com/");
    }

    #[test]
    fn keeps_reserved_escapes() {
        assert_eq!(
            decode_uri("https://example.com/a%2Fb%3Fc%23d%20e").unwrap(),
            "https://example.com/a%2Fb%3Fc%23d e"
        );
        assert_eq!(decode_uri("/%2f%2F").unwrap(), "/%2f%2F");
    }

    #[test]
    fn malformed_escapes_are_kept() {
        assert_eq!(decode_uri("/100%").unwrap(), "/100%");
        assert_eq!(decode_uri("/%zz/%4").unwrap(), "/%zz/%4");
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let error = decode_uri("/%E4%BD").unwrap_err();
        assert_eq!(error.kind(), LicensingErrorKind::Decode);
    }

    #[test]
    fn pretty_permalink_strips_and_decodes() {
        assert_eq!(
            pretty_permalink("https://x/%E6%96%87/index.html").unwrap(),
            "https://x/文/"
        );
    }
}
