//! Go string literal quoting.

/// Decode a Go string literal (interpreted `"..."` or raw `` `...` ``).
///
/// Returns `None` for malformed literals and for escapes producing
/// non-UTF-8 bytes.
pub fn unquote(literal: &str) -> Option<String> {
    if let Some(raw) = literal
        .strip_prefix('`')
        .and_then(|rest| rest.strip_suffix('`'))
    {
        return Some(raw.replace('\r', ""));
    }

    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => {
                let escaped = match chars.next()? {
                    'a' => '\x07',
                    'b' => '\x08',
                    'f' => '\x0c',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'v' => '\x0b',
                    '\\' => '\\',
                    '"' => '"',
                    'x' => code_point(&mut chars, 2, 16).filter(|c| c.is_ascii())?,
                    'u' => code_point(&mut chars, 4, 16)?,
                    'U' => code_point(&mut chars, 8, 16)?,
                    first @ '0'..='7' => {
                        let rest: String = chars.by_ref().take(2).collect();
                        let digits = format!("{first}{rest}");
                        let value = u32::from_str_radix(&digits, 8).ok()?;
                        char::from_u32(value).filter(|c| digits.len() == 3 && c.is_ascii())?
                    }
                    _ => return None,
                };
                out.push(escaped);
            }
            _ => out.push(c),
        }
    }
    Some(out)
}

fn code_point(chars: &mut std::str::Chars<'_>, len: usize, radix: u32) -> Option<char> {
    let digits: String = chars.by_ref().take(len).collect();
    if digits.len() != len {
        return None;
    }
    char::from_u32(u32::from_str_radix(&digits, radix).ok()?)
}

/// Render `value` as an interpreted Go string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
