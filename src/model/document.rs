//! Document adapter over `lopdf`.
//!
//! Everything the orchestrators do to a PDF goes through [`Document`]; no
//! other module touches the lopdf object graph directly.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use lopdf::{Dictionary, Object, ObjectId, SaveOptions, Stream};

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};

use super::metadata::{blank_info, Metadata};
use super::page::{PageGeometry, PageInfo, Rect};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Page boundary boxes rescaled together with the page.
const BOX_KEYS: [&[u8]; 5] = [b"MediaBox", b"CropBox", b"BleedBox", b"TrimBox", b"ArtBox"];

/// Guard against cyclic `/Parent` chains.
const MAX_TREE_DEPTH: usize = 64;

static NULL_OBJECT: Object = Object::Null;

/// How a document is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveProfile {
    /// Classic cross-reference table, one indirect object at a time
    Classic,
    /// Non-stream objects packed into object streams with an xref stream
    ObjectStreams {
        /// Objects flushed per object stream
        objects_per_stream: usize,
    },
}

/// An in-memory PDF document.
pub struct Document {
    inner: lopdf::Document,
}

impl Document {
    /// Create an empty document with a catalog and an empty page tree.
    pub fn new() -> Self {
        let mut inner = lopdf::Document::with_version("1.5");
        let pages_id = inner.new_object_id();
        inner.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Kids", Object::Array(Vec::new())),
                ("Count", Object::Integer(0)),
            ])),
        );
        let catalog_id = inner.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        inner.trailer.set("Root", Object::Reference(catalog_id));
        Self { inner }
    }

    /// Load a document from bytes.
    ///
    /// Anything that is not a parseable PDF yields `Error::Malformed`.
    pub fn load(data: &[u8]) -> Result<Self> {
        detect_format_from_bytes(data).map_err(|e| Error::Malformed(e.to_string()))?;

        let inner = lopdf::Document::load_mem(data).map_err(|e| Error::Malformed(e.to_string()))?;
        if inner.is_encrypted() {
            log::warn!("Loaded an encrypted document; output may not be readable");
        }

        let document = Self { inner };
        document
            .pages_root()
            .map_err(|e| Error::Malformed(e.to_string()))?;
        Ok(document)
    }

    /// PDF version string.
    pub fn version(&self) -> &str {
        &self.inner.version
    }

    /// Raise the header version to at least `version`.
    pub fn ensure_version(&mut self, version: &str) {
        if self.inner.version.as_str() < version {
            self.inner.version = version.to_string();
        }
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.inner.get_pages().len() as u32
    }

    /// Page object ids in reading order.
    pub fn page_ids(&self) -> Vec<ObjectId> {
        self.inner.get_pages().into_values().collect()
    }

    /// Object id of the page with the given 1-indexed number.
    pub fn page_id(&self, number: u32) -> Result<ObjectId> {
        let pages = self.inner.get_pages();
        pages
            .get(&number)
            .copied()
            .ok_or(Error::PageOutOfRange(number, pages.len() as u32))
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    /// Read document metadata.
    pub fn metadata(&self) -> Metadata {
        let mut metadata = Metadata {
            pdf_version: self.inner.version.clone(),
            page_count: self.page_count(),
            encrypted: self.inner.is_encrypted(),
            ..Default::default()
        };

        if let Some(info) = self
            .inner
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|obj| self.resolve(obj).as_dict().ok())
        {
            metadata.read_info(info);
        }

        metadata
    }

    /// Blank the info dictionary, stamp its dates with `now` and drop the
    /// catalog's XMP metadata stream.
    pub fn clear_metadata(&mut self, now: DateTime<Utc>) -> Result<()> {
        let existing = self.inner.trailer.get(b"Info").ok().cloned();
        let info_id = match existing {
            Some(Object::Reference(id)) => id,
            Some(Object::Dictionary(dict)) => {
                let id = self.inner.add_object(dict);
                self.inner.trailer.set("Info", Object::Reference(id));
                id
            }
            _ => {
                let id = self.inner.add_object(Dictionary::new());
                self.inner.trailer.set("Info", Object::Reference(id));
                id
            }
        };

        let info = self.inner.get_object_mut(info_id)?.as_dict_mut()?;
        blank_info(info, now);

        self.catalog_mut()?.remove(b"Metadata");
        Ok(())
    }

    /// Remove the document outline. Returns whether one existed.
    pub fn remove_outlines(&mut self) -> Result<bool> {
        let catalog = self.catalog_mut()?;
        let existed = catalog.remove(b"Outlines").is_some();
        if matches!(catalog.get(b"PageMode"), Ok(Object::Name(mode)) if mode == b"UseOutlines") {
            catalog.set("PageMode", Object::Name(b"UseNone".to_vec()));
        }
        Ok(existed)
    }

    /// Whether the catalog references an outline.
    pub fn has_outlines(&self) -> bool {
        self.catalog()
            .map(|catalog| catalog.has(b"Outlines"))
            .unwrap_or(false)
    }

    // ------------------------------------------------------------------
    // Page geometry
    // ------------------------------------------------------------------

    /// Size of a page, taken from its (possibly inherited) MediaBox.
    pub fn page_geometry(&self, page_id: ObjectId) -> Result<PageGeometry> {
        let media_box = self
            .inherited(page_id, b"MediaBox")?
            .ok_or_else(|| Error::PdfStructure(format!("page {:?} has no MediaBox", page_id)))?;
        Ok(PageGeometry::from_rect(self.rect(&media_box)?))
    }

    /// Summary of every page.
    pub fn page_infos(&self) -> Result<Vec<PageInfo>> {
        self.inner
            .get_pages()
            .into_iter()
            .map(|(number, page_id)| -> Result<PageInfo> {
                let rotation = match self.inherited(page_id, b"Rotate")? {
                    Some(Object::Integer(degrees)) => degrees,
                    _ => 0,
                };
                Ok(PageInfo {
                    number,
                    geometry: self.page_geometry(page_id)?,
                    rotation,
                    annotations: self.annotation_ids(page_id).len(),
                })
            })
            .collect()
    }

    /// Uniformly rescale a page: its boxes, its content and its annotation
    /// rectangles.
    ///
    /// On error the page is left exactly as it was.
    pub fn scale_page(&mut self, page_id: ObjectId, factor: f32) -> Result<()> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(Error::InvalidOptions(format!(
                "scale factor must be positive, got {}",
                factor
            )));
        }

        let mut boxes = Vec::with_capacity(BOX_KEYS.len());
        for key in BOX_KEYS {
            let value = if INHERITABLE_KEYS.contains(&key) {
                self.inherited(page_id, key)?
            } else {
                self.page_dict(page_id)?
                    .get(key)
                    .ok()
                    .map(|value| self.resolve(value).clone())
            };
            if let Some(value) = value {
                boxes.push((key, self.rect(&value)?.scaled(factor)));
            }
        }
        if boxes.is_empty() {
            return Err(Error::PdfStructure(format!(
                "page {:?} has no MediaBox",
                page_id
            )));
        }

        let mut annot_rects = Vec::new();
        for annot_id in self.annotation_ids(page_id) {
            let rect = match self
                .inner
                .get_dictionary(annot_id)
                .ok()
                .and_then(|annot| annot.get(b"Rect").ok())
            {
                Some(value) => self.rect(value)?,
                None => continue,
            };
            annot_rects.push((annot_id, rect.scaled(factor)));
        }

        // Every fallible read is done; the page is only written from here on.
        let contents = self.page_dict(page_id)?.get(b"Contents").ok().cloned();
        let wrapped = match contents {
            Some(existing) => {
                let mut parts = Vec::new();
                match self.resolve(&existing) {
                    Object::Array(items) => parts.extend(items.iter().cloned()),
                    _ => parts.push(existing.clone()),
                }
                let head = self.inner.add_object(Stream::new(
                    Dictionary::new(),
                    format!("q {} 0 0 {} 0 0 cm\n", factor, factor).into_bytes(),
                ));
                let tail = self
                    .inner
                    .add_object(Stream::new(Dictionary::new(), b"\nQ\n".to_vec()));
                parts.insert(0, Object::Reference(head));
                parts.push(Object::Reference(tail));
                Some(Object::Array(parts))
            }
            None => None,
        };

        for (annot_id, rect) in annot_rects {
            self.inner
                .get_object_mut(annot_id)?
                .as_dict_mut()?
                .set("Rect", rect_object(rect));
        }

        let page = self.page_dict_mut(page_id)?;
        for (key, rect) in boxes {
            page.set(key, rect_object(rect));
        }
        if let Some(contents) = wrapped {
            page.set("Contents", contents);
        }
        Ok(())
    }

    /// Drop the annotations of a page. Returns how many were removed.
    pub fn remove_annotations(&mut self, page_id: ObjectId) -> Result<usize> {
        let count = match self.page_dict(page_id)?.get(b"Annots") {
            Ok(annots) => self.resolve(annots).as_array().map(Vec::len).unwrap_or(0),
            Err(_) => return Ok(0),
        };
        self.page_dict_mut(page_id)?.remove(b"Annots");
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Page import
    // ------------------------------------------------------------------

    /// Copy a page of `importer`'s source document to the end of this
    /// document. Returns the id of the new page.
    ///
    /// Objects the page depends on are copied once per importer, so pages
    /// of one source that share fonts or images share the copies.
    pub fn import_page(&mut self, importer: &mut PageImporter<'_>, page_id: ObjectId) -> Result<ObjectId> {
        let source = importer.source;
        let mut page = source.page_dict(page_id)?.clone();

        for key in INHERITABLE_KEYS {
            if !page.has(key) {
                if let Some(value) = source.inherited(page_id, key)? {
                    page.set(key, value);
                }
            }
        }
        page.remove(b"Parent");

        let new_page_id = self.inner.new_object_id();
        importer.id_map.insert(page_id, new_page_id);
        importer.current_page = Some(page_id);

        let mut translated = self.translate(importer, &Object::Dictionary(page))?;
        let pages_root = self.pages_root()?;
        if let Object::Dictionary(ref mut dict) = translated {
            dict.set("Parent", Object::Reference(pages_root));
        }
        self.inner.objects.insert(new_page_id, translated);

        let root = self.inner.get_object_mut(pages_root)?.as_dict_mut()?;
        let mut kids = match root.get(b"Kids") {
            Ok(Object::Array(kids)) => kids.clone(),
            _ => Vec::new(),
        };
        kids.push(Object::Reference(new_page_id));
        let count = kids.len() as i64;
        root.set("Kids", Object::Array(kids));
        root.set("Count", Object::Integer(count));

        Ok(new_page_id)
    }

    /// Rewrite `object` for this document, copying referenced objects from
    /// the importer's source on first sight.
    fn translate(&mut self, importer: &mut PageImporter<'_>, object: &Object) -> Result<Object> {
        Ok(match object {
            Object::Reference(id) => Object::Reference(match importer.id_map.get(id) {
                Some(mapped) => *mapped,
                None => {
                    let source = importer.source;
                    let Some(target) = source.inner.objects.get(id) else {
                        return Ok(Object::Null);
                    };
                    if importer.is_foreign_tree_node(*id, target) {
                        return Ok(Object::Null);
                    }
                    let new_id = self.inner.new_object_id();
                    importer.id_map.insert(*id, new_id);
                    let copied = self.translate(importer, target)?;
                    self.inner.objects.insert(new_id, copied);
                    new_id
                }
            }),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.translate(importer, item))
                    .collect::<Result<_>>()?,
            ),
            Object::Dictionary(dict) => Object::Dictionary(self.translate_dict(importer, dict)?),
            Object::Stream(stream) => {
                let mut copy = stream.clone();
                copy.dict = self.translate_dict(importer, &stream.dict)?;
                Object::Stream(copy)
            }
            other => other.clone(),
        })
    }

    fn translate_dict(&mut self, importer: &mut PageImporter<'_>, dict: &Dictionary) -> Result<Dictionary> {
        let mut out = Dictionary::new();
        for (key, value) in dict.iter() {
            out.set(key.clone(), self.translate(importer, value)?);
        }
        Ok(out)
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    /// Drop unreachable objects, flate-compress streams and serialize.
    pub fn save(&mut self, profile: SaveProfile) -> Result<Vec<u8>> {
        let pruned = self.inner.prune_objects();
        if !pruned.is_empty() {
            log::debug!("Pruned {} unreachable objects", pruned.len());
        }
        self.inner.compress();

        let mut buffer = Vec::new();
        match profile {
            SaveProfile::Classic => self
                .inner
                .save_to(&mut buffer)
                .map_err(|e| Error::Save(e.to_string()))?,
            SaveProfile::ObjectStreams { objects_per_stream } => {
                // Object streams arrived with PDF 1.5.
                self.ensure_version("1.5");
                let options = SaveOptions::builder()
                    .use_object_streams(true)
                    .use_xref_streams(true)
                    .max_objects_per_stream(objects_per_stream)
                    .build();
                self.inner
                    .save_with_options(&mut buffer, options)
                    .map_err(|e| Error::Save(e.to_string()))?;
            }
        }
        Ok(buffer)
    }

    // ------------------------------------------------------------------
    // Object graph helpers
    // ------------------------------------------------------------------

    fn catalog(&self) -> Result<&Dictionary> {
        let root = self.inner.trailer.get(b"Root")?.as_reference()?;
        Ok(self.inner.get_dictionary(root)?)
    }

    fn catalog_mut(&mut self) -> Result<&mut Dictionary> {
        let root = self.inner.trailer.get(b"Root")?.as_reference()?;
        Ok(self.inner.get_object_mut(root)?.as_dict_mut()?)
    }

    fn pages_root(&self) -> Result<ObjectId> {
        match self.catalog()?.get(b"Pages") {
            Ok(Object::Reference(id)) => Ok(*id),
            _ => Err(Error::PdfStructure(
                "catalog has no indirect /Pages entry".to_string(),
            )),
        }
    }

    fn page_dict(&self, page_id: ObjectId) -> Result<&Dictionary> {
        Ok(self.inner.get_dictionary(page_id)?)
    }

    fn page_dict_mut(&mut self, page_id: ObjectId) -> Result<&mut Dictionary> {
        Ok(self.inner.get_object_mut(page_id)?.as_dict_mut()?)
    }

    /// Follow a reference (or a short chain of them) to its target.
    fn resolve<'a>(&'a self, object: &'a Object) -> &'a Object {
        let mut current = object;
        for _ in 0..MAX_TREE_DEPTH {
            match current {
                Object::Reference(id) => match self.inner.objects.get(id) {
                    Some(target) => current = target,
                    None => return &NULL_OBJECT,
                },
                _ => return current,
            }
        }
        current
    }

    /// Look up `key` on the page, then on its ancestors.
    fn inherited(&self, page_id: ObjectId, key: &[u8]) -> Result<Option<Object>> {
        let mut node = self.page_dict(page_id)?;
        for _ in 0..MAX_TREE_DEPTH {
            if let Ok(value) = node.get(key) {
                return Ok(Some(self.resolve(value).clone()));
            }
            match node.get(b"Parent") {
                Ok(Object::Reference(parent)) => node = self.inner.get_dictionary(*parent)?,
                _ => return Ok(None),
            }
        }
        Err(Error::PdfStructure("page tree is too deep or cyclic".to_string()))
    }

    fn rect(&self, object: &Object) -> Result<Rect> {
        let values = self
            .resolve(object)
            .as_array()
            .map_err(|_| Error::PdfStructure("rectangle is not an array".to_string()))?;
        let numbers: Vec<f32> = values
            .iter()
            .filter_map(|value| number(self.resolve(value)))
            .collect();
        match numbers[..] {
            [x0, y0, x1, y1] => Ok(Rect::new(x0, y0, x1, y1)),
            _ => Err(Error::PdfStructure(format!(
                "rectangle needs 4 numbers, found {}",
                numbers.len()
            ))),
        }
    }

    fn annotation_ids(&self, page_id: ObjectId) -> Vec<ObjectId> {
        self.page_dict(page_id)
            .ok()
            .and_then(|page| page.get(b"Annots").ok())
            .and_then(|annots| self.resolve(annots).as_array().ok())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_reference().ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("version", &self.inner.version)
            .field("pages", &self.page_count())
            .field("objects", &self.inner.objects.len())
            .finish()
    }
}

/// Copy state for importing pages from one source document.
pub struct PageImporter<'s> {
    source: &'s Document,
    source_pages: HashSet<ObjectId>,
    id_map: HashMap<ObjectId, ObjectId>,
    current_page: Option<ObjectId>,
}

impl<'s> PageImporter<'s> {
    /// Start importing from `source`.
    pub fn new(source: &'s Document) -> Self {
        Self {
            source,
            source_pages: source.page_ids().into_iter().collect(),
            id_map: HashMap::new(),
            current_page: None,
        }
    }

    /// Number of source objects copied so far.
    pub fn copied_objects(&self) -> usize {
        self.id_map.len()
    }

    /// Page-tree nodes other than the page being imported are not copied:
    /// links to other pages become null, parents are re-pointed.
    fn is_foreign_tree_node(&self, id: ObjectId, target: &Object) -> bool {
        if self.source_pages.contains(&id) {
            return Some(id) != self.current_page;
        }
        let type_name = match target {
            Object::Dictionary(dict) => dict.get(b"Type").ok().and_then(|t| t.as_name().ok()),
            _ => None,
        };
        matches!(type_name, Some(b"Pages") | Some(b"Catalog"))
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}

fn rect_object(rect: Rect) -> Object {
    Object::Array(
        [rect.x0, rect.y0, rect.x1, rect.y1]
            .into_iter()
            .map(|v| Object::Real(v.into()))
            .collect(),
    )
}
