//! Flattens rendered receipt HTML into text and lays it out as an A4 PDF.

use std::collections::HashMap;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};
use ttf_parser::GlyphId;

use crate::error::PaygateError;
use crate::service::font::{FontMetrics, ReceiptFont};

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 56;
const FONT_SIZE: i64 = 11;
const LEADING: i64 = 16;
/// Usable line width in glyph space (1/1000 em at `FONT_SIZE`).
const LINE_WIDTH: i64 = (PAGE_WIDTH - 2 * MARGIN) * 1000 / FONT_SIZE;
const FONT_NAME: &str = "PaygateReceipt";

/// Tags that end the current line.
const BLOCK_TAGS: &[&str] = &[
    "br", "p", "div", "tr", "li", "ul", "ol", "table", "h1", "h2", "h3", "h4", "h5", "h6", "hr",
    "section", "header", "footer", "title",
];

/// Tags whose text content never reaches the page.
const HIDDEN_TAGS: &[&str] = &["head", "style", "script"];

/// Convert rendered HTML into PDF bytes, setting text in `font`.
pub fn html_to_pdf(html: &str, font: &ReceiptFont) -> Result<Vec<u8>, PaygateError> {
    let metrics = font.metrics()?;
    let lines: Vec<String> = html_to_lines(html)
        .iter()
        .flat_map(|line| wrap(line, LINE_WIDTH, |c| metrics.char_width(c)))
        .collect();
    render_pages(&lines, font, &metrics)
}

/// Reduce HTML to trimmed, non-empty text lines.
pub(crate) fn html_to_lines(html: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut hidden_depth = 0usize;
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        if hidden_depth == 0 {
            push_text(&mut current, &rest[..lt]);
        }
        let Some(gt) = rest[lt..].find('>') else {
            rest = "";
            break;
        };
        let tag = &rest[lt + 1..lt + gt];
        rest = &rest[lt + gt + 1..];

        let closing = tag.starts_with('/');
        let name: String = tag
            .trim_start_matches('/')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        if HIDDEN_TAGS.contains(&name.as_str()) {
            if closing {
                hidden_depth = hidden_depth.saturating_sub(1);
            } else if !tag.ends_with('/') {
                hidden_depth += 1;
            }
            continue;
        }
        if hidden_depth > 0 {
            continue;
        }
        if BLOCK_TAGS.contains(&name.as_str()) {
            flush_line(&mut lines, &mut current);
        } else if closing && (name == "td" || name == "th") {
            current.push_str("   ");
        }
    }
    if hidden_depth == 0 {
        push_text(&mut current, rest);
    }
    flush_line(&mut lines, &mut current);
    lines
}

fn push_text(current: &mut String, raw: &str) {
    let text = decode_entities(raw);
    for word in text.split_whitespace() {
        if !current.is_empty() && !current.ends_with(' ') {
            current.push(' ');
        }
        current.push_str(word);
    }
}

fn flush_line(lines: &mut Vec<String>, current: &mut String) {
    let line = current.trim();
    if !line.is_empty() {
        lines.push(line.to_string());
    }
    current.clear();
}

fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

/// Break `line` so no piece is wider than `width`. Words wider than a whole
/// line are split between characters.
fn wrap(line: &str, width: i64, measure: impl Fn(char) -> i64) -> Vec<String> {
    let space = measure(' ');
    let mut out = Vec::new();
    let mut current = String::new();
    let mut used = 0;
    for word in line.split(' ') {
        let word_width: i64 = word.chars().map(&measure).sum();
        if !current.is_empty() && used + space + word_width > width {
            out.push(std::mem::take(&mut current));
            used = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            used += space;
        }
        for c in word.chars() {
            let w = measure(c);
            if !current.is_empty() && used + w > width {
                out.push(std::mem::take(&mut current));
                used = 0;
            }
            current.push(c);
            used += w;
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Characters used by the document, numbered from CID 1 in first-seen order.
/// CID 0 stays `.notdef`.
#[derive(Default)]
struct CharSet {
    chars: Vec<char>,
    cids: HashMap<char, u16>,
}

impl CharSet {
    /// Two-byte big-endian CIDs for an Identity-H text operand.
    fn encode(&mut self, line: &str) -> Vec<u8> {
        line.chars()
            .flat_map(|c| self.cid(c).to_be_bytes())
            .collect()
    }

    fn cid(&mut self, c: char) -> u16 {
        if let Some(&cid) = self.cids.get(&c) {
            return cid;
        }
        let Ok(cid) = u16::try_from(self.chars.len() + 1) else {
            return 0;
        };
        self.chars.push(c);
        self.cids.insert(c, cid);
        cid
    }
}

/// `ToUnicode` CMap mapping every CID back to the UTF-16 of its character.
fn to_unicode_cmap(chars: &[char]) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo <<\n/Registry (Adobe)\n/Ordering (UCS)\n/Supplement 0\n>> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );
    for (block, chunk) in chars.chunks(100).enumerate() {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (i, c) in chunk.iter().enumerate() {
            let cid = block * 100 + i + 1;
            let mut units = [0u16; 2];
            let target: String = c
                .encode_utf16(&mut units)
                .iter()
                .map(|unit| format!("{unit:04X}"))
                .collect();
            cmap.push_str(&format!("<{cid:04X}> <{target}>\n"));
        }
        cmap.push_str("endbfchar\n");
    }
    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end",
    );
    cmap
}

/// Embed the font as a Type0 font over a CIDFontType2 descendant.
fn add_font(
    doc: &mut Document,
    font: &ReceiptFont,
    metrics: &FontMetrics<'_>,
    chars: &[char],
) -> ObjectId {
    let mut cid_to_gid = vec![0u8; 2 * (chars.len() + 1)];
    let mut widths = Vec::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        let glyph = metrics.glyph(c);
        cid_to_gid[2 * (i + 1)..2 * (i + 2)].copy_from_slice(&glyph.0.to_be_bytes());
        widths.push(Object::Integer(metrics.advance(glyph)));
    }
    let w: Vec<Object> = if widths.is_empty() {
        vec![]
    } else {
        vec![Object::Integer(1), Object::Array(widths)]
    };

    let data = font.data();
    let font_file_id = doc.add_object(Stream::new(
        dictionary! { "Length1" => data.len() as i64 },
        data.to_vec(),
    ));
    let [x_min, y_min, x_max, y_max] = metrics.bbox();
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => FONT_NAME,
        "Flags" => 32,
        "FontBBox" => vec![
            Object::Integer(x_min),
            Object::Integer(y_min),
            Object::Integer(x_max),
            Object::Integer(y_max),
        ],
        "ItalicAngle" => 0,
        "Ascent" => metrics.ascent(),
        "Descent" => metrics.descent(),
        "CapHeight" => metrics.cap_height(),
        "StemV" => 80,
        "FontFile2" => font_file_id,
    });
    let cid_to_gid_id = doc.add_object(Stream::new(dictionary! {}, cid_to_gid));
    let descendant_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => FONT_NAME,
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor_id,
        "DW" => metrics.advance(GlyphId(0)),
        "W" => w,
        "CIDToGIDMap" => cid_to_gid_id,
    });
    let to_unicode_id = doc.add_object(Stream::new(
        dictionary! {},
        to_unicode_cmap(chars).into_bytes(),
    ));
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => FONT_NAME,
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(descendant_id)],
        "ToUnicode" => to_unicode_id,
    })
}

fn render_pages(
    lines: &[String],
    font: &ReceiptFont,
    metrics: &FontMetrics<'_>,
) -> Result<Vec<u8>, PaygateError> {
    let per_page = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

    let mut charset = CharSet::default();
    let encoded: Vec<Vec<u8>> = lines.iter().map(|line| charset.encode(line)).collect();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = add_font(&mut doc, font, metrics, &charset.chars);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let chunks: Vec<&[Vec<u8>]> = if encoded.is_empty() {
        vec![&encoded[..]]
    } else {
        encoded.chunks(per_page).collect()
    };

    let mut kids: Vec<Object> = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), Object::Integer(FONT_SIZE)]),
            Operation::new("TL", vec![Object::Integer(LEADING)]),
            Operation::new(
                "Td",
                vec![
                    Object::Integer(MARGIN),
                    Object::Integer(PAGE_HEIGHT - MARGIN),
                ],
            ),
        ];
        for line in chunk {
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(line.clone(), StringFormat::Hexadecimal)],
            ));
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let stream = content
            .encode()
            .map_err(|e| PaygateError::Pdf(format!("encode page content: {e}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, stream));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| PaygateError::Pdf(format!("serialize document: {e}")))?;
    Ok(bytes)
}
