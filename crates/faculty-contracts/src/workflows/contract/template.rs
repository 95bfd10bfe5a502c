use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, Run, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Placeholder name -> replacement value, unique keys. Built fresh per
/// request from the personal fields plus the flattened benefits record.
#[derive(Debug, Clone, Default)]
pub struct TokenMap {
    values: BTreeMap<String, String>,
}

impl TokenMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replaces every `{{name}}` occurrence for which a value is known.
    /// Returns None when nothing in `text` matched, so callers can skip
    /// rewriting untouched runs.
    fn apply(&self, text: &str) -> Option<String> {
        let mut out = text.to_string();
        let mut changed = false;
        for (name, value) in &self.values {
            let token = format!("{{{{{name}}}}}");
            if out.contains(&token) {
                out = out.replace(&token, value);
                changed = true;
            }
        }
        changed.then_some(out)
    }
}

/// A loaded .docx letter template. Holds the raw bytes and re-parses per
/// fill, so the source is never mutated and every generation works on an
/// independent in-memory copy.
#[derive(Debug, Clone)]
pub struct DocxTemplate {
    bytes: Vec<u8>,
}

impl DocxTemplate {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TemplateError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(bytes)
    }

    /// Validates the document up front: a broken template must fail the
    /// whole batch before any per-row work starts.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, TemplateError> {
        read_docx(&bytes)?;
        Ok(Self { bytes })
    }

    /// The distinct `{{...}}` names this template expects. Detection runs
    /// on each paragraph's joined run text, so names split across runs
    /// are still found.
    pub fn placeholders(&self) -> Result<BTreeSet<String>, TemplateError> {
        let mut found = BTreeSet::new();
        for segment in segment_texts(&self.bytes)? {
            scan_tokens(&segment, &mut found);
        }
        Ok(found)
    }

    /// Produces a filled copy of the template. Placeholders without a
    /// TokenMap entry stay verbatim so missing inputs are visible in the
    /// output rather than silently blanked.
    pub fn fill(&self, tokens: &TokenMap) -> Result<Vec<u8>, TemplateError> {
        let mut docx = read_docx(&self.bytes)?;
        for child in &mut docx.document.children {
            match child {
                DocumentChild::Paragraph(paragraph) => {
                    fill_paragraph(paragraph.as_mut(), tokens);
                }
                DocumentChild::Table(table) => {
                    fill_table(table.as_mut(), tokens);
                }
                _ => {}
            }
        }
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor)?;
        Ok(cursor.into_inner())
    }
}

/// Joined run text of every paragraph in the document body, table cells
/// included. One entry per paragraph.
pub fn segment_texts(bytes: &[u8]) -> Result<Vec<String>, TemplateError> {
    let docx = read_docx(bytes)?;
    let mut segments = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => {
                segments.push(paragraph_text(paragraph.as_ref()));
            }
            DocumentChild::Table(table) => collect_table_texts(table.as_ref(), &mut segments),
            _ => {}
        }
    }
    Ok(segments)
}

/// The document body as plain text, one line per paragraph.
pub fn document_text(bytes: &[u8]) -> Result<String, TemplateError> {
    Ok(segment_texts(bytes)?.join("\n"))
}

fn collect_table_texts(table: &Table, segments: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row;
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell;
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => {
                        segments.push(paragraph_text(paragraph));
                    }
                    TableCellContent::Table(inner) => collect_table_texts(inner, segments),
                    _ => {}
                }
            }
        }
    }
}

fn fill_table(table: &mut Table, tokens: &TokenMap) -> bool {
    let mut changed = false;
    for row in &mut table.rows {
        let TableChild::TableRow(row) = row;
        for cell in &mut row.cells {
            let TableRowChild::TableCell(cell) = cell;
            for content in &mut cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => {
                        changed |= fill_paragraph(paragraph, tokens);
                    }
                    TableCellContent::Table(inner) => {
                        changed |= fill_table(inner, tokens);
                    }
                    _ => {}
                }
            }
        }
    }
    changed
}

fn fill_paragraph(paragraph: &mut Paragraph, tokens: &TokenMap) -> bool {
    let mut changed = false;

    // Tokens contained in a single run are replaced in place, keeping
    // that run's formatting intact.
    for child in &mut paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for part in &mut run.children {
                if let RunChild::Text(text) = part {
                    if let Some(replaced) = tokens.apply(&text.text) {
                        text.text = replaced;
                        changed = true;
                    }
                }
            }
        }
    }

    // Tokens split across run boundaries only show up in the joined
    // paragraph text. Collapsing the runs is the price of replacing
    // them; the first run's properties carry over.
    let joined = paragraph_text(paragraph);
    if let Some(replaced) = tokens.apply(&joined) {
        collapse_runs(paragraph, replaced);
        changed = true;
    }

    changed
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut buffer = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for part in &run.children {
                if let RunChild::Text(text) = part {
                    buffer.push_str(&text.text);
                }
            }
        }
    }
    buffer
}

fn collapse_runs(paragraph: &mut Paragraph, text: String) {
    let first_run_index = paragraph
        .children
        .iter()
        .position(|child| matches!(child, ParagraphChild::Run(_)));
    let style = paragraph.children.iter().find_map(|child| match child {
        ParagraphChild::Run(run) => Some(run.run_property.clone()),
        _ => None,
    });

    paragraph
        .children
        .retain(|child| !matches!(child, ParagraphChild::Run(_)));

    let mut run = Run::new().add_text(text);
    if let Some(style) = style {
        run.run_property = style;
    }
    let index = first_run_index
        .unwrap_or(paragraph.children.len())
        .min(paragraph.children.len());
    paragraph
        .children
        .insert(index, ParagraphChild::Run(Box::new(run)));
}

fn scan_tokens(text: &str, found: &mut BTreeSet<String>) {
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                if !name.is_empty() && !name.contains("{{") {
                    found.insert(name.to_string());
                }
                rest = &after[end + 2..];
            }
            None => break,
        }
    }
}

#[derive(Debug)]
pub enum TemplateError {
    Io(std::io::Error),
    Docx(docx_rs::ReaderError),
    Pack(zip::result::ZipError),
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::Io(err) => write!(f, "failed to read template file: {}", err),
            TemplateError::Docx(err) => write!(f, "invalid .docx template: {}", err),
            TemplateError::Pack(err) => write!(f, "failed to serialize filled document: {}", err),
        }
    }
}

impl std::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TemplateError::Io(err) => Some(err),
            TemplateError::Docx(err) => Some(err),
            TemplateError::Pack(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for TemplateError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<docx_rs::ReaderError> for TemplateError {
    fn from(err: docx_rs::ReaderError) -> Self {
        Self::Docx(err)
    }
}

impl From<zip::result::ZipError> for TemplateError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Pack(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};

    fn pack(docx: Docx) -> Vec<u8> {
        let mut docx = docx;
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).expect("test docx packs");
        cursor.into_inner()
    }

    fn tokens(pairs: &[(&str, &str)]) -> TokenMap {
        let mut map = TokenMap::new();
        for (name, value) in pairs {
            map.insert(*name, *value);
        }
        map
    }

    #[test]
    fn replaces_a_token_inside_a_single_run() {
        let bytes = pack(Docx::new().add_paragraph(
            Paragraph::new().add_run(Run::new().add_text("Dear {{Candidate_Name}},")),
        ));
        let template = DocxTemplate::from_bytes(bytes).expect("template loads");
        let filled = template
            .fill(&tokens(&[("Candidate_Name", "Jane Doe")]))
            .expect("fill succeeds");
        let text = document_text(&filled).expect("filled doc parses");
        assert!(text.contains("Dear Jane Doe,"));
        assert!(!text.contains("{{"));
    }

    #[test]
    fn replaces_a_token_split_across_two_runs() {
        let bytes = pack(
            Docx::new().add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Dear {{Candidate_"))
                    .add_run(Run::new().add_text("Name}}, welcome.")),
            ),
        );
        let template = DocxTemplate::from_bytes(bytes).expect("template loads");
        let filled = template
            .fill(&tokens(&[("Candidate_Name", "Jane Doe")]))
            .expect("fill succeeds");
        let text = document_text(&filled).expect("filled doc parses");
        assert!(text.contains("Dear Jane Doe, welcome."));
        assert!(!text.contains("{{"));
    }

    #[test]
    fn replaces_tokens_inside_table_cells() {
        let table = Table::new(vec![TableRow::new(vec![TableCell::new().add_paragraph(
            Paragraph::new().add_run(Run::new().add_text("{{Workload_Hours}} hours")),
        )])]);
        let bytes = pack(Docx::new().add_table(table));
        let template = DocxTemplate::from_bytes(bytes).expect("template loads");
        let filled = template
            .fill(&tokens(&[("Workload_Hours", "12")]))
            .expect("fill succeeds");
        let text = document_text(&filled).expect("filled doc parses");
        assert!(text.contains("12 hours"));
    }

    #[test]
    fn unknown_tokens_pass_through_verbatim() {
        let bytes = pack(Docx::new().add_paragraph(
            Paragraph::new().add_run(Run::new().add_text("Salary: {{Total_Compensation}} AED")),
        ));
        let template = DocxTemplate::from_bytes(bytes).expect("template loads");
        let filled = template
            .fill(&tokens(&[("Candidate_Name", "Jane Doe")]))
            .expect("fill succeeds");
        let text = document_text(&filled).expect("filled doc parses");
        assert!(text.contains("{{Total_Compensation}}"));
    }

    #[test]
    fn filling_a_filled_document_changes_nothing() {
        let bytes = pack(Docx::new().add_paragraph(
            Paragraph::new().add_run(Run::new().add_text("Offer for {{Candidate_Name}}")),
        ));
        let map = tokens(&[("Candidate_Name", "Jane Doe")]);
        let template = DocxTemplate::from_bytes(bytes).expect("template loads");
        let once = template.fill(&map).expect("first fill succeeds");
        let twice = DocxTemplate::from_bytes(once.clone())
            .expect("filled doc reloads")
            .fill(&map)
            .expect("second fill succeeds");
        assert_eq!(
            document_text(&once).expect("parses"),
            document_text(&twice).expect("parses")
        );
    }

    #[test]
    fn same_token_repeated_is_replaced_everywhere() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(
                    Paragraph::new().add_run(Run::new().add_text("To: {{Candidate_Name}}")),
                )
                .add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text("Signed by {{Candidate_Name}} below")),
                ),
        );
        let template = DocxTemplate::from_bytes(bytes).expect("template loads");
        let filled = template
            .fill(&tokens(&[("Candidate_Name", "Jane Doe")]))
            .expect("fill succeeds");
        let text = document_text(&filled).expect("filled doc parses");
        assert_eq!(text.matches("Jane Doe").count(), 2);
    }

    #[test]
    fn placeholders_lists_split_and_cell_tokens() {
        let table = Table::new(vec![TableRow::new(vec![TableCell::new().add_paragraph(
            Paragraph::new().add_run(Run::new().add_text("{{Course_Level}}")),
        )])]);
        let bytes = pack(
            Docx::new()
                .add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text("{{Candidate_"))
                        .add_run(Run::new().add_text("Name}} and {{Offer_Date}}")),
                )
                .add_table(table),
        );
        let template = DocxTemplate::from_bytes(bytes).expect("template loads");
        let names = template.placeholders().expect("placeholders scan");
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["Candidate_Name", "Course_Level", "Offer_Date"]);
    }

    #[test]
    fn rejects_bytes_that_are_not_a_docx() {
        assert!(DocxTemplate::from_bytes(b"not a zip archive".to_vec()).is_err());
    }
}
