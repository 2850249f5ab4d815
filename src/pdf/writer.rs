const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;
const FONT_SIZE: u32 = 12;
const LEFT_MARGIN: i64 = 50;
const FIRST_BASELINE: i64 = 800;
const LINE_HEIGHT: i64 = 18;

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FONT_ID: usize = 3;

/// Accumulates numbered objects and remembers where each one starts.
struct PdfWriter {
    out: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new(object_count: usize) -> Self {
        let mut out = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            out,
            offsets: vec![0; object_count + 1],
        }
    }

    fn object(&mut self, id: usize, body: &[u8]) {
        self.offsets[id] = self.out.len();
        self.out.extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
        self.out.extend_from_slice(body);
        self.out.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, id: usize, content: &[u8]) {
        let mut body = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(b"\nendstream");
        self.object(id, &body);
    }

    fn finish(mut self) -> Vec<u8> {
        let xref_offset = self.out.len();
        let size = self.offsets.len();

        let mut table = format!("xref\n0 {}\n0000000000 65535 f \n", size);
        for offset in &self.offsets[1..] {
            table.push_str(&format!("{:010} 00000 n \n", offset));
        }
        table.push_str(&format!(
            "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            size, CATALOG_ID, xref_offset
        ));
        self.out.extend_from_slice(table.as_bytes());
        self.out
    }
}

/// Write a PDF with one page per entry of `pages`.
///
/// Each `\n`-separated line is set in 12pt Helvetica, 18pt apart, from the
/// top-left of an A4 page. Characters outside Latin-1 are written as `?`.
/// An empty slice yields a single blank page.
pub fn create_pdf(pages: &[&str]) -> Vec<u8> {
    let pages: Vec<&str> = if pages.is_empty() { vec![""] } else { pages.to_vec() };
    let mut pdf = PdfWriter::new(FONT_ID + 2 * pages.len());

    pdf.object(
        CATALOG_ID,
        format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_ID).as_bytes(),
    );
    pdf.object(
        FONT_ID,
        b"<< /Type /Font /Subtype /Type1 /Name /F1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );

    let mut kids = Vec::with_capacity(pages.len());
    for (i, text) in pages.iter().enumerate() {
        let content_id = FONT_ID + 1 + 2 * i;
        let page_id = content_id + 1;

        pdf.stream(content_id, &page_content(text));
        pdf.object(
            page_id,
            format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] /Resources << /Font << /F1 {} 0 R >> >> /Contents {} 0 R >>",
                PAGES_ID, PAGE_WIDTH, PAGE_HEIGHT, FONT_ID, content_id
            )
            .as_bytes(),
        );
        kids.push(format!("{} 0 R", page_id));
    }

    pdf.object(
        PAGES_ID,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            kids.len()
        )
        .as_bytes(),
    );

    pdf.finish()
}

fn page_content(text: &str) -> Vec<u8> {
    let mut content = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let y = FIRST_BASELINE - LINE_HEIGHT * i as i64;
        content.extend_from_slice(
            format!("BT /F1 {} Tf {} {} Td (", FONT_SIZE, LEFT_MARGIN, y).as_bytes(),
        );
        content.extend(encode_literal(line));
        content.extend_from_slice(b") Tj ET\n");
    }
    content
}

/// Latin-1 bytes of `line` with `\`, `(` and `)` escaped.
fn encode_literal(line: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push(b'\\');
                out.push(c as u8);
            }
            c => out.push(u8::try_from(u32::from(c)).unwrap_or(b'?')),
        }
    }
    out
}
