//! Printable representation of raw received bytes, e.g. `b'Hello, world'`

/// Render bytes as a `b'...'` literal.
///
/// Printable ASCII is kept, `\t`, `\n`, `\r` and backslash are escaped, and
/// everything else becomes `\xNN`. Single quotes delimit the literal unless
/// the data holds a single quote and no double quote.
pub fn bytes_repr(data: &[u8]) -> String {
    let quote = if data.contains(&b'\'') && !data.contains(&b'"') { '"' } else { '\'' };

    let mut out = String::with_capacity(data.len() + 3);
    out.push('b');
    out.push(quote);
    for &byte in data {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b if b as char == quote => {
                out.push('\\');
                out.push(quote);
            }
            0x20..=0x7e => out.push(byte as char),
            _ => out.push_str(&format!("\\x{:02x}", byte)),
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(bytes_repr(b"Hello, world"), "b'Hello, world'");
        assert_eq!(bytes_repr(b""), "b''");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(bytes_repr(b"a\tb\nc\rd\\"), "b'a\\tb\\nc\\rd\\\\'");
        assert_eq!(bytes_repr(&[0x00, 0x7f, 0xff]), "b'\\x00\\x7f\\xff'");
    }

    #[test]
    fn test_quote_selection() {
        assert_eq!(bytes_repr(b"it's"), "b\"it's\"");
        assert_eq!(bytes_repr(b"say \"hi\""), "b'say \"hi\"'");
        assert_eq!(bytes_repr(b"'\""), "b'\\'\"'");
    }
}
