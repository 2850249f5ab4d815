use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A literal string shown with `Tj`, or an array shown with `TJ`.
    static ref SHOW_TEXT: Regex =
        Regex::new(r"(?s)\(((?:\\.|[^\\)])*)\)\s*Tj|\[((?:\\.|[^\\\]])*)\]\s*TJ").unwrap();
    /// Literal strings inside a `TJ` array; kerning numbers are skipped.
    static ref ARRAY_STRING: Regex = Regex::new(r"(?s)\(((?:\\.|[^\\)])*)\)").unwrap();
}

/// Text recovered from one chunk of a PDF, plus its edit buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfPage {
    pub original: String,
    pub edited: String,
}

impl PdfPage {
    pub fn new(text: impl Into<String>) -> Self {
        let original = text.into();
        Self {
            edited: original.clone(),
            original,
        }
    }
}

/// Best-effort text extraction.
///
/// The file is read as Latin-1 and split on `\nstartxref`; each chunk's
/// text-showing operators become one line each. Chunks without text are
/// dropped, so the result may be empty. Never fails.
pub fn extract_pages(pdf: &[u8]) -> Vec<PdfPage> {
    let text: String = pdf.iter().map(|&b| b as char).collect();

    let pages: Vec<PdfPage> = text
        .split("\nstartxref")
        .filter_map(|chunk| {
            let lines = chunk_lines(chunk);
            if lines.is_empty() {
                None
            } else {
                Some(PdfPage::new(lines.join("\n")))
            }
        })
        .collect();

    log::debug!("pdf: {} text chunk(s) in {} bytes", pages.len(), pdf.len());
    pages
}

fn chunk_lines(chunk: &str) -> Vec<String> {
    SHOW_TEXT
        .captures_iter(chunk)
        .map(|caps| {
            if let Some(literal) = caps.get(1) {
                unescape(literal.as_str())
            } else {
                let array = caps.get(2).map_or("", |m| m.as_str());
                ARRAY_STRING
                    .captures_iter(array)
                    .map(|c| unescape(&c[1]))
                    .collect()
            }
        })
        .collect()
}

/// Resolve the backslash escapes of a PDF literal string.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some(d @ '0'..='7') => {
                let mut code = d.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                // High-order overflow is ignored
                out.push(char::from((code & 0xFF) as u8));
            }
            // Line continuation
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some('\n') => {}
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tj() {
        let pdf = b"%PDF-1.4\nBT /F1 12 Tf 50 800 Td (Hi there) Tj ET\nstartxref\n0\n%%EOF";
        assert_eq!(extract_pages(pdf), vec![PdfPage::new("Hi there")]);
    }

    #[test]
    fn test_tj_array_and_order() {
        let pdf = b"BT (First) Tj [(Sec) -120 (ond) 33.5 (!)] TJ (Third)Tj ET";
        let pages = extract_pages(pdf);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].original, "First\nSecond!\nThird");
        assert_eq!(pages[0].edited, pages[0].original);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(unescape(r"a\(b\)c\\d"), r"a(b)c\d");
        assert_eq!(unescape(r"tab\tnl\n"), "tab\tnl\n");
        assert_eq!(unescape(r"\101\102C\7"), "ABC\u{7}");
        assert_eq!(unescape(r"caf\351"), "café");
        assert_eq!(unescape("split\\\nline"), "splitline");
    }

    #[test]
    fn test_escaped_paren_inside_literal() {
        let pdf = br"BT (f\(x\) = 1) Tj ET";
        assert_eq!(extract_pages(pdf)[0].original, "f(x) = 1");
    }

    #[test]
    fn test_chunks_without_text_are_dropped() {
        let pdf = b"BT (One) Tj ET\nstartxref\n10\n%%EOF\n1 0 obj<<>>endobj\nstartxref\n20\nBT (Two) Tj ET";
        let texts: Vec<String> = extract_pages(pdf).into_iter().map(|p| p.original).collect();
        assert_eq!(texts, vec!["One", "Two"]);
    }

    #[test]
    fn test_no_text() {
        assert!(extract_pages(b"not a pdf at all").is_empty());
        assert!(extract_pages(b"").is_empty());
    }
}
