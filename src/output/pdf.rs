use anyhow::Result;

use super::DocumentRenderer;

// A4 geometry and Helvetica metrics the layout is tuned for
const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;
const MARGIN: u32 = 56;

const TITLE_FONT_SIZE: u32 = 14;
const BODY_FONT_SIZE: u32 = 11;
const TITLE_LEADING: u32 = 16;
const BODY_LEADING: u32 = 14;

const TITLE_WRAP_COLS: usize = 68;
const BODY_WRAP_COLS: usize = 90;
const LINES_PER_PAGE: usize = 50;

/// Built-in PDF renderer.
///
/// Emits a self-contained PDF 1.4 document: Helvetica with WinAnsi encoding,
/// greedy word wrap, one content stream per page, hand-built cross-reference
/// table. Only Latin-1 text is representable; anything above U+00FF is
/// written as `?`, matching the normalizer's placeholder.
#[derive(Debug, Default)]
pub struct PdfRenderer;

impl DocumentRenderer for PdfRenderer {
    fn render(&self, title: &str, body: &str) -> Result<Vec<u8>> {
        let title_lines = wrap_text(title, TITLE_WRAP_COLS);
        let body_lines = wrap_text(body, BODY_WRAP_COLS);
        let pages = paginate(&title_lines, &body_lines);

        Ok(assemble(&pages))
    }
}

struct PageContent {
    /// Title lines, styled bold; only ever present on the first page
    title_lines: Vec<String>,
    body_lines: Vec<String>,
}

fn paginate(title_lines: &[String], body_lines: &[String]) -> Vec<PageContent> {
    // Title plus one blank separator line reduce the first page's capacity
    let first_capacity = LINES_PER_PAGE.saturating_sub(title_lines.len() + 1).max(1);

    let mut pages = vec![PageContent {
        title_lines: title_lines.to_vec(),
        body_lines: body_lines.iter().take(first_capacity).cloned().collect(),
    }];

    for chunk in body_lines
        .iter()
        .skip(first_capacity)
        .collect::<Vec<&String>>()
        .chunks(LINES_PER_PAGE)
    {
        pages.push(PageContent {
            title_lines: Vec::new(),
            body_lines: chunk.iter().map(|line| line.to_string()).collect(),
        });
    }

    pages
}

fn content_stream(page: &PageContent) -> Vec<u8> {
    let top = PAGE_HEIGHT - MARGIN - TITLE_FONT_SIZE;
    let mut ops = String::new();

    ops.push_str("BT\n");
    if page.title_lines.is_empty() {
        ops.push_str(&format!("/F1 {BODY_FONT_SIZE} Tf\n{BODY_LEADING} TL\n{MARGIN} {top} Td\n"));
    } else {
        ops.push_str(&format!("/F2 {TITLE_FONT_SIZE} Tf\n{TITLE_LEADING} TL\n{MARGIN} {top} Td\n"));
        for line in &page.title_lines {
            ops.push_str(&format!("({}) Tj\nT*\n", escape_text(line)));
        }
        // Blank separator line, then drop to the body font
        ops.push_str("T*\n");
        ops.push_str(&format!("/F1 {BODY_FONT_SIZE} Tf\n{BODY_LEADING} TL\n"));
    }

    for line in &page.body_lines {
        ops.push_str(&format!("({}) Tj\nT*\n", escape_text(line)));
    }
    ops.push_str("ET\n");

    latin1_bytes(&ops)
}

fn assemble(pages: &[PageContent]) -> Vec<u8> {
    // Objects: 1 catalog, 2 page tree, 3-4 fonts, then a page and a content
    // stream object per page
    let object_count = 4 + 2 * pages.len();
    let mut offsets = vec![0usize; object_count + 1];
    let mut doc: Vec<u8> = b"%PDF-1.4\n".to_vec();

    let kids = (0..pages.len())
        .map(|i| format!("{} 0 R", 5 + 2 * i))
        .collect::<Vec<String>>()
        .join(" ");

    push_object(&mut doc, &mut offsets, 1, b"<< /Type /Catalog /Pages 2 0 R >>");
    push_object(
        &mut doc,
        &mut offsets,
        2,
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, pages.len()).as_bytes(),
    );
    push_object(
        &mut doc,
        &mut offsets,
        3,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );
    push_object(
        &mut doc,
        &mut offsets,
        4,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
    );

    for (i, page) in pages.iter().enumerate() {
        let page_id = 5 + 2 * i;
        let stream_id = page_id + 1;

        push_object(
            &mut doc,
            &mut offsets,
            page_id,
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {stream_id} 0 R >>"
            )
            .as_bytes(),
        );

        let stream = content_stream(page);
        let mut stream_object = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        stream_object.extend_from_slice(&stream);
        stream_object.extend_from_slice(b"\nendstream");
        push_object(&mut doc, &mut offsets, stream_id, &stream_object);
    }

    let xref_offset = doc.len();
    doc.extend_from_slice(format!("xref\n0 {}\n", object_count + 1).as_bytes());
    doc.extend_from_slice(b"0000000000 65535 f \n");
    for id in 1..=object_count {
        doc.extend_from_slice(format!("{:010} 00000 n \n", offsets[id]).as_bytes());
    }
    doc.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            object_count + 1,
            xref_offset
        )
        .as_bytes(),
    );

    doc
}

fn push_object(doc: &mut Vec<u8>, offsets: &mut [usize], id: usize, body: &[u8]) {
    offsets[id] = doc.len();
    doc.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
    doc.extend_from_slice(body);
    doc.extend_from_slice(b"\nendobj\n");
}

/// Greedy word wrap; words longer than the width are hard-split
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;

        while word.chars().count() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split_at = word
                .char_indices()
                .nth(width)
                .map(|(index, _)| index)
                .unwrap_or(word.len());
            lines.push(word[..split_at].to_string());
            word = &word[split_at..];
        }

        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Escape the delimiters of a PDF literal string
fn escape_text(line: &str) -> String {
    let mut escaped = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Latin-1 encode a content stream. Characters above U+00FF become '?',
/// though the normalizer has already replaced them for body text.
fn latin1_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) <= 0xFF { c as u8 } else { b'?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|window| window == needle)
    }

    #[test]
    fn test_render_single_page_document() {
        let pdf = PdfRenderer
            .render("Transcripción: demo", "Hello world")
            .unwrap();

        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert!(pdf.ends_with(b"%%EOF\n"));
        assert!(contains(&pdf, b"(Hello world) Tj"));
        assert!(contains(&pdf, b"/Helvetica-Bold"));
        assert!(contains(&pdf, b"/Count 1"));
    }

    #[test]
    fn test_render_long_body_spans_pages() {
        let body = "palabra ".repeat(3000);
        let pdf = PdfRenderer.render("Título", &body).unwrap();

        let page_markers = pdf
            .windows(b"/Type /Page ".len())
            .filter(|window| *window == b"/Type /Page ")
            .count();
        assert!(page_markers > 1, "expected more than one page object");
    }

    #[test]
    fn test_escapes_string_delimiters() {
        let pdf = PdfRenderer.render("t", "before (aside) after").unwrap();
        assert!(contains(&pdf, b"(before \\(aside\\) after) Tj"));
    }

    #[test]
    fn test_latin1_text_is_single_byte_encoded() {
        let pdf = PdfRenderer.render("t", "canción").unwrap();
        // ó is 0xF3 in Latin-1; the UTF-8 pair must not appear
        assert!(contains(&pdf, &[b'c', b'a', b'n', b'c', b'i', 0xF3, b'n']));
        assert!(!contains(&pdf, &[0xC3, 0xB3]));
    }

    #[test]
    fn test_startxref_points_at_xref_table() {
        let pdf = PdfRenderer.render("t", "body").unwrap();
        let text = String::from_utf8_lossy(&pdf);

        let start = text.rfind("startxref\n").unwrap() + "startxref\n".len();
        let end = text[start..].find('\n').unwrap() + start;
        let offset: usize = text[start..end].trim().parse().unwrap();

        assert_eq!(&pdf[offset..offset + 4], b"xref");
    }

    #[test]
    fn test_wrap_text_greedy() {
        assert_eq!(wrap_text("a bb ccc", 5), vec!["a bb", "ccc"]);
        assert_eq!(wrap_text("", 10), Vec::<String>::new());
    }

    #[test]
    fn test_wrap_text_hard_splits_long_words() {
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }
}
