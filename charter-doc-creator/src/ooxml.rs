//! OOXML package plumbing shared by the PPTX and DOCX writers
//!
//! Parts are written into a ZIP archive in the order they are added. Every
//! entry carries the same fixed DOS timestamp, so identical parts always
//! produce an identical package.

use anyhow::{bail, Result};
use std::borrow::Cow;
use std::fmt::Write as FmtWrite;
use std::io::{Cursor, Seek, Write};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, DateTime};

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const NS_DRAWINGML: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

pub const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
pub const REL_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
pub const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
pub const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

pub const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
pub const CT_XML: &str = "application/xml";
pub const CT_CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
pub const CT_EXTENDED_PROPERTIES: &str =
    "application/vnd.openxmlformats-officedocument.extended-properties+xml";
pub const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";

/// Escape text for element content and attribute values.
pub fn escape(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

/// Builder for `[Content_Types].xml`.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    defaults: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    /// Content types every package needs: relationships and plain XML.
    pub fn new() -> Self {
        let mut types = Self::default();
        types.add_default("rels", CT_RELATIONSHIPS);
        types.add_default("xml", CT_XML);
        types
    }

    pub fn add_default(&mut self, extension: &str, content_type: &str) -> &mut Self {
        self.defaults
            .push((extension.to_string(), content_type.to_string()));
        self
    }

    /// `part_name` is absolute, e.g. `/ppt/presentation.xml`.
    pub fn add_override(&mut self, part_name: &str, content_type: &str) -> &mut Self {
        self.overrides
            .push((part_name.to_string(), content_type.to_string()));
        self
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + 128 * self.overrides.len());
        xml.push_str(XML_DECLARATION);
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        for (extension, content_type) in &self.defaults {
            let _ = write!(
                xml,
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                extension, content_type
            );
        }
        for (part_name, content_type) in &self.overrides {
            let _ = write!(
                xml,
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                part_name, content_type
            );
        }
        xml.push_str("</Types>");
        xml
    }
}

/// Builder for one `.rels` part. Ids are assigned `rId1`, `rId2`, ... in
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<(String, String, String)>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship and return its id.
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries
            .push((id.clone(), rel_type.to_string(), target.to_string()));
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + 160 * self.entries.len());
        xml.push_str(XML_DECLARATION);
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (id, rel_type, target) in &self.entries {
            let _ = write!(
                xml,
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                id,
                rel_type,
                escape(target)
            );
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// Document properties written to `docProps/core.xml` and `docProps/app.xml`.
/// Created/modified dates are left out so output stays reproducible.
#[derive(Debug, Clone)]
pub struct DocProperties {
    pub title: String,
    pub creator: String,
    pub application: String,
}

impl DocProperties {
    pub fn core_xml(&self) -> String {
        let mut xml = String::with_capacity(512);
        xml.push_str(XML_DECLARATION);
        xml.push_str(concat!(
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" "#,
            r#"xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
        ));
        let _ = write!(
            xml,
            "<dc:title>{}</dc:title><dc:creator>{}</dc:creator>",
            escape(&self.title),
            escape(&self.creator)
        );
        xml.push_str("</cp:coreProperties>");
        xml
    }

    pub fn app_xml(&self) -> String {
        let mut xml = String::with_capacity(256);
        xml.push_str(XML_DECLARATION);
        xml.push_str(
            r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#,
        );
        let _ = write!(
            xml,
            "<Application>{}</Application>",
            escape(&self.application)
        );
        xml.push_str("</Properties>");
        xml
    }

    /// Register both property parts with a package's content types and
    /// root relationships.
    pub fn register(&self, content_types: &mut ContentTypes, root_rels: &mut Relationships) {
        content_types.add_override("/docProps/core.xml", CT_CORE_PROPERTIES);
        content_types.add_override("/docProps/app.xml", CT_EXTENDED_PROPERTIES);
        root_rels.add(REL_CORE_PROPERTIES, "docProps/core.xml");
        root_rels.add(REL_EXTENDED_PROPERTIES, "docProps/app.xml");
    }
}

/// Writes parts into a ZIP container.
pub struct PackageWriter<W: Write + Seek> {
    zip_writer: ZipWriter<W>,
    part_names: Vec<String>,
}

impl PackageWriter<Cursor<Vec<u8>>> {
    /// Create a new package writer that writes to memory
    pub fn new() -> Self {
        Self::with_writer(Cursor::new(Vec::new()))
    }

    /// Finish the archive and return its bytes.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        Ok(self.finish()?.into_inner())
    }
}

impl Default for PackageWriter<Cursor<Vec<u8>>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Seek> PackageWriter<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            zip_writer: ZipWriter::new(writer),
            part_names: Vec::new(),
        }
    }

    fn options() -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
    }

    /// Add a part. `path` is relative to the package root, e.g.
    /// `ppt/slides/slide1.xml`.
    pub fn add_part(&mut self, path: &str, content: &[u8]) -> Result<()> {
        if self.part_names.iter().any(|p| p == path) {
            bail!("duplicate package part: {}", path);
        }
        self.zip_writer.start_file(path, Self::options())?;
        self.zip_writer.write_all(content)?;
        self.part_names.push(path.to_string());
        Ok(())
    }

    pub fn add_xml(&mut self, path: &str, xml: &str) -> Result<()> {
        self.add_part(path, xml.as_bytes())
    }

    pub fn part_names(&self) -> &[String] {
        &self.part_names
    }

    pub fn finish(self) -> Result<W> {
        Ok(self.zip_writer.finish()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn relationship_ids_follow_insertion_order() {
        let mut rels = Relationships::new();
        assert_eq!(rels.add(REL_THEME, "theme/theme1.xml"), "rId1");
        assert_eq!(rels.add(REL_STYLES, "styles.xml"), "rId2");
        let xml = rels.to_xml();
        assert!(xml.contains(r#"Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml""#));
    }

    #[test]
    fn content_types_carry_defaults_and_overrides() {
        let mut types = ContentTypes::new();
        types.add_override("/word/document.xml", "application/test");
        let xml = types.to_xml();
        assert!(xml.contains(r#"<Default Extension="rels""#));
        assert!(xml.contains(r#"<Override PartName="/word/document.xml" ContentType="application/test"/>"#));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("R&D <x>"), "R&amp;D &lt;x&gt;");
        assert_eq!(escape("客戶"), "客戶");
    }

    #[test]
    fn duplicate_parts_are_rejected() {
        let mut writer = PackageWriter::new();
        writer.add_xml("a.xml", "<a/>").unwrap();
        assert!(writer.add_xml("a.xml", "<b/>").is_err());
    }

    #[test]
    fn packages_are_reproducible_and_readable() {
        let build = || {
            let mut writer = PackageWriter::new();
            writer.add_xml("[Content_Types].xml", &ContentTypes::new().to_xml()).unwrap();
            writer.add_xml("word/document.xml", "<w:document/>").unwrap();
            writer.into_bytes().unwrap()
        };
        let first = build();
        assert_eq!(first, build());

        let mut archive = zip::ZipArchive::new(Cursor::new(first)).unwrap();
        assert_eq!(archive.len(), 2);
        let mut body = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "<w:document/>");
    }
}
