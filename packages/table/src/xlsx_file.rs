//! Excel workbooks (`.xlsx`).
//!
//! Reading takes the first worksheet in workbook order and uses its first
//! row as the header. Shared strings, inline strings, numbers, and
//! booleans are mapped to [`CellValue`]s; error cells and empty strings
//! become [`CellValue::Null`].
//!
//! Writing produces a single-sheet workbook with inline strings. Every row
//! that [`Table::row_updated`] reports as standardized gets a light green
//! fill so changed rows stand out when the file is opened.

use std::io::{Cursor, Read, Seek, Write};

use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesDecl, BytesEnd, BytesRef, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::{CellValue, Table, TableError};

const TAG_SHEET: QName = QName(b"sheet");
const TAG_SHARED_STRING: QName = QName(b"si");
const TAG_PHONETIC: QName = QName(b"rPh");
const TAG_TEXT: QName = QName(b"t");
const TAG_ROW: QName = QName(b"row");
const TAG_CELL: QName = QName(b"c");
const TAG_VALUE: QName = QName(b"v");
const TAG_RELATIONSHIP: &[u8] = b"Relationship";

const CONTENT_TYPES: &str = "[Content_Types].xml";
const ROOT_RELS: &str = "_rels/.rels";
const WORKBOOK: &str = "xl/workbook.xml";
const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
const STYLES: &str = "xl/styles.xml";
const SHARED_STRINGS: &str = "xl/sharedStrings.xml";
const FIRST_SHEET: &str = "xl/worksheets/sheet1.xml";

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// `cellXfs` index of the green fill in [`STYLES_XML`].
const UPDATED_STYLE: &str = "1";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Addresses" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="3"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill><fill><patternFill patternType="solid"><fgColor rgb="FFC6EFCE"/><bgColor indexed="64"/></patternFill></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="0" fillId="2" borderId="0" xfId="0" applyFill="1"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

fn xml_error(error: impl Into<quick_xml::Error>) -> TableError {
    TableError::Xml(error.into())
}

fn xml_reader(xml: &[u8]) -> Reader<&[u8]> {
    let mut reader = Reader::from_reader(xml);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.expand_empty_elements = true;
    config.trim_text(false);
    reader
}

/// Contents of an archive member, or `None` if it is absent.
fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<Vec<u8>>, TableError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

fn attribute(event: &BytesStart<'_>, name: &str) -> Result<Option<String>, TableError> {
    let Some(attribute) = event.try_get_attribute(name).map_err(xml_error)? else {
        return Ok(None);
    };
    Ok(Some(attribute.unescape_value().map_err(xml_error)?.into_owned()))
}

fn push_text(out: &mut String, text: &BytesText<'_>) -> Result<(), TableError> {
    out.push_str(&text.xml_content().map_err(xml_error)?);
    Ok(())
}

/// Appends the character an entity or character reference stands for.
/// Unknown entities are kept as written.
fn push_reference(out: &mut String, reference: &BytesRef<'_>) -> Result<(), TableError> {
    let raw = reference.xml_content().map_err(xml_error)?;
    if let Some(number) = raw.strip_prefix('#') {
        let code = number.strip_prefix('x').map_or_else(
            || number.parse::<u32>().ok(),
            |hex| u32::from_str_radix(hex, 16).ok(),
        );
        if let Some(c) = code.and_then(char::from_u32) {
            out.push(c);
        }
    } else if let Some(entity) = resolve_xml_entity(&raw) {
        out.push_str(entity);
    } else {
        out.push('&');
        out.push_str(&raw);
        out.push(';');
    }
    Ok(())
}

/// Zero-based column of a cell reference such as `AB12`.
fn column_index(reference: &str) -> Option<usize> {
    let letters: Vec<u8> = reference
        .bytes()
        .take_while(u8::is_ascii_alphabetic)
        .take(3)
        .collect();
    if letters.is_empty() {
        return None;
    }
    let index = letters.iter().fold(0usize, |acc, b| {
        acc * 26 + usize::from(b.to_ascii_uppercase() - b'A') + 1
    });
    Some(index - 1)
}

/// Column letters for a zero-based index: `0` is `A`, `26` is `AA`.
fn column_name(index: usize) -> String {
    const LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut letters = Vec::new();
    let mut remaining = index;
    loop {
        letters.push(LETTERS[remaining % 26]);
        if remaining < 26 {
            break;
        }
        remaining = remaining / 26 - 1;
    }
    letters.iter().rev().map(|&b| char::from(b)).collect()
}

/// Archive path of the first sheet listed in the workbook.
fn first_sheet_path<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String, TableError> {
    let workbook = read_part(archive, WORKBOOK)?
        .ok_or_else(|| TableError::Spreadsheet(format!("missing {WORKBOOK}")))?;

    let mut reader = xml_reader(&workbook);
    let mut sheet_id = None;
    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(event) if event.name() == TAG_SHEET => {
                for attribute in event.attributes() {
                    let attribute = attribute.map_err(xml_error)?;
                    if attribute.key.local_name().as_ref() == b"id" {
                        sheet_id = Some(attribute.unescape_value().map_err(xml_error)?.into_owned());
                    }
                }
                break;
            }
            Event::Eof => break,
            _ => {}
        }
    }
    let sheet_id = sheet_id.ok_or_else(|| TableError::Spreadsheet("workbook has no sheets".into()))?;

    let Some(rels) = read_part(archive, WORKBOOK_RELS)? else {
        return Ok(FIRST_SHEET.to_string());
    };
    let mut reader = xml_reader(&rels);
    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
                if attribute(&event, "Id")?.as_deref() == Some(sheet_id.as_str()) {
                    let target = attribute(&event, "Target")?
                        .ok_or_else(|| TableError::Spreadsheet("relationship without target".into()))?;
                    return Ok(target
                        .strip_prefix('/')
                        .map_or_else(|| format!("xl/{target}"), str::to_string));
                }
            }
            Event::Eof => return Ok(FIRST_SHEET.to_string()),
            _ => {}
        }
    }
}

fn shared_strings(xml: &[u8]) -> Result<Vec<String>, TableError> {
    let mut reader = xml_reader(xml);
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut in_phonetic = false;
    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(event) if event.name() == TAG_SHARED_STRING => current.clear(),
            Event::End(event) if event.name() == TAG_SHARED_STRING => {
                strings.push(std::mem::take(&mut current));
            }
            Event::Start(event) if event.name() == TAG_PHONETIC => in_phonetic = true,
            Event::End(event) if event.name() == TAG_PHONETIC => in_phonetic = false,
            Event::Start(event) if event.name() == TAG_TEXT => in_text = !in_phonetic,
            Event::End(event) if event.name() == TAG_TEXT => in_text = false,
            Event::Text(text) if in_text => push_text(&mut current, &text)?,
            Event::GeneralRef(reference) if in_text => push_reference(&mut current, &reference)?,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(strings)
}

fn cell_value(kind: &str, raw: String, shared: &[String]) -> CellValue {
    if raw.is_empty() {
        return CellValue::Null;
    }
    match kind {
        "s" => raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|index| shared.get(index))
            .filter(|text| !text.is_empty())
            .map_or(CellValue::Null, |text| CellValue::Text(text.clone())),
        "b" => CellValue::Boolean(raw.trim() == "1"),
        "e" => CellValue::Null,
        "str" | "inlineStr" | "d" => CellValue::Text(raw),
        _ => raw
            .parse::<i64>()
            .map(CellValue::Integer)
            .or_else(|_| raw.parse::<f64>().map(CellValue::Float))
            .unwrap_or(CellValue::Text(raw)),
    }
}

fn sheet_rows(xml: &[u8], shared: &[String]) -> Result<Vec<Vec<CellValue>>, TableError> {
    let mut reader = xml_reader(xml);
    let mut rows = Vec::new();
    let mut row: Vec<CellValue> = Vec::new();
    let mut cell: Option<(usize, String)> = None;
    let mut raw = String::new();
    let mut in_value = false;
    let mut in_phonetic = false;
    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(event) if event.name() == TAG_ROW => row.clear(),
            Event::End(event) if event.name() == TAG_ROW => rows.push(std::mem::take(&mut row)),
            Event::Start(event) if event.name() == TAG_CELL => {
                let column = attribute(&event, "r")?
                    .and_then(|reference| column_index(&reference))
                    .unwrap_or(row.len());
                let kind = attribute(&event, "t")?.unwrap_or_default();
                cell = Some((column, kind));
                raw.clear();
            }
            Event::End(event) if event.name() == TAG_CELL => {
                if let Some((column, kind)) = cell.take() {
                    if row.len() <= column {
                        row.resize(column + 1, CellValue::Null);
                    }
                    row[column] = cell_value(&kind, std::mem::take(&mut raw), shared);
                }
            }
            Event::Start(event) if event.name() == TAG_PHONETIC => in_phonetic = true,
            Event::End(event) if event.name() == TAG_PHONETIC => in_phonetic = false,
            Event::Start(event) if event.name() == TAG_VALUE || event.name() == TAG_TEXT => {
                in_value = cell.is_some() && !in_phonetic;
            }
            Event::End(event) if event.name() == TAG_VALUE || event.name() == TAG_TEXT => {
                in_value = false;
            }
            Event::Text(text) if in_value => push_text(&mut raw, &text)?,
            Event::GeneralRef(reference) if in_value => push_reference(&mut raw, &reference)?,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(rows)
}

/// Reads the first worksheet of an `.xlsx` workbook.
///
/// Header names are trimmed; short rows are padded with nulls.
///
/// # Errors
///
/// Returns [`TableError::EmptyInput`] if the sheet has no header row,
/// [`TableError::Zip`] or [`TableError::Xml`] if the workbook cannot be
/// decoded, or [`TableError::Spreadsheet`] if a required part is missing.
pub fn read_xlsx(bytes: &[u8]) -> Result<Table, TableError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let sheet_path = first_sheet_path(&mut archive)?;

    let shared = match read_part(&mut archive, SHARED_STRINGS)? {
        Some(xml) => shared_strings(&xml)?,
        None => Vec::new(),
    };
    let sheet = read_part(&mut archive, &sheet_path)?
        .ok_or_else(|| TableError::Spreadsheet(format!("missing {sheet_path}")))?;

    let mut rows = sheet_rows(&sheet, &shared)?.into_iter();
    let headers: Vec<String> = rows
        .next()
        .unwrap_or_default()
        .iter()
        .map(|cell| cell.to_string().trim().to_owned())
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(TableError::EmptyInput);
    }

    let table = Table::from_rows(headers, rows.collect());
    log::debug!("Parsed {} rows from {sheet_path}", table.row_count());
    Ok(table)
}

fn file_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

fn write_cell<W: Write>(
    xml: &mut Writer<W>,
    reference: &str,
    value: &CellValue,
    style: Option<&str>,
) -> Result<(), TableError> {
    let mut cell = BytesStart::new("c");
    cell.push_attribute(("r", reference));
    if let Some(style) = style {
        cell.push_attribute(("s", style));
    }

    let (kind, text) = match value {
        CellValue::Null => {
            if style.is_some() {
                xml.write_event(Event::Empty(cell))?;
            }
            return Ok(());
        }
        CellValue::Text(text) => (Some("inlineStr"), text.clone()),
        CellValue::Integer(n) => (None, n.to_string()),
        CellValue::Float(f) if f.is_finite() => (None, f.to_string()),
        CellValue::Float(f) => (Some("inlineStr"), f.to_string()),
        CellValue::Boolean(b) => (Some("b"), if *b { "1" } else { "0" }.to_string()),
    };
    if let Some(kind) = kind {
        cell.push_attribute(("t", kind));
    }
    xml.write_event(Event::Start(cell))?;

    if kind == Some("inlineStr") {
        let mut t = BytesStart::new("t");
        t.push_attribute(("xml:space", "preserve"));
        xml.write_event(Event::Start(BytesStart::new("is")))?;
        xml.write_event(Event::Start(t))?;
        xml.write_event(Event::Text(BytesText::new(&text)))?;
        xml.write_event(Event::End(BytesEnd::new("t")))?;
        xml.write_event(Event::End(BytesEnd::new("is")))?;
    } else {
        xml.write_event(Event::Start(BytesStart::new("v")))?;
        xml.write_event(Event::Text(BytesText::new(&text)))?;
        xml.write_event(Event::End(BytesEnd::new("v")))?;
    }

    xml.write_event(Event::End(BytesEnd::new("c")))?;
    Ok(())
}

fn write_row<W: Write>(
    xml: &mut Writer<W>,
    number: usize,
    cells: &[CellValue],
    style: Option<&str>,
) -> Result<(), TableError> {
    let mut row = BytesStart::new("row");
    row.push_attribute(("r", number.to_string().as_str()));
    xml.write_event(Event::Start(row))?;
    for (column, value) in cells.iter().enumerate() {
        let reference = format!("{}{number}", column_name(column));
        write_cell(xml, &reference, value, style)?;
    }
    xml.write_event(Event::End(BytesEnd::new("row")))?;
    Ok(())
}

fn write_sheet<W: Write>(table: &Table, out: W) -> Result<(), TableError> {
    let mut xml = Writer::new(out);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut root = BytesStart::new("worksheet");
    root.push_attribute(("xmlns", SPREADSHEET_NS));
    xml.write_event(Event::Start(root))?;
    xml.write_event(Event::Start(BytesStart::new("sheetData")))?;

    let header: Vec<CellValue> = table
        .columns()
        .iter()
        .map(|name| CellValue::from(name.as_str()))
        .collect();
    write_row(&mut xml, 1, &header, None)?;

    for (index, cells) in table.rows().iter().enumerate() {
        let style = table.row_updated(index).then_some(UPDATED_STYLE);
        write_row(&mut xml, index + 2, cells, style)?;
    }

    xml.write_event(Event::End(BytesEnd::new("sheetData")))?;
    xml.write_event(Event::End(BytesEnd::new("worksheet")))?;
    Ok(())
}

/// Writes `table` as a one-sheet workbook and returns the inner writer.
///
/// # Errors
///
/// Returns [`TableError`] if the archive cannot be written.
pub fn write_xlsx<W: Write + Seek>(table: &Table, writer: W) -> Result<W, TableError> {
    let mut zip = ZipWriter::new(writer);
    for (name, contents) in [
        (CONTENT_TYPES, CONTENT_TYPES_XML),
        (ROOT_RELS, ROOT_RELS_XML),
        (WORKBOOK, WORKBOOK_XML),
        (WORKBOOK_RELS, WORKBOOK_RELS_XML),
        (STYLES, STYLES_XML),
    ] {
        zip.start_file(name, file_options())?;
        zip.write_all(contents.as_bytes())?;
    }

    zip.start_file(FIRST_SHEET, file_options())?;
    write_sheet(table, &mut zip)?;

    Ok(zip.finish()?)
}
