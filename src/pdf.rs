//! PDF form-field inspection and filling over `lopdf`.
//!
//! A straightforward pass-through to the document-object model: enumerate
//! AcroForm field names, read trailer metadata, and set `/V` on text fields.
//! Values land on matching `/Tx` fields only; other field types are skipped
//! silently, mirroring how a viewer rejects `setText` on non-text widgets.

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;
use lopdf::{Document, Object, ObjectId, StringFormat};
use serde::Serialize;

use crate::error::Result;

/// Trailer metadata plus the form field names of a document.
#[derive(Debug, Serialize)]
pub struct PdfDocumentInfo {
    pub metadata: BTreeMap<String, String>,
    pub fields: Vec<String>,
}

/// Outcome of a fill pass: which fields received a value and which were
/// skipped because they are not text fields.
#[derive(Debug, Serialize)]
pub struct FillReport {
    pub filled: Vec<String>,
    pub skipped: Vec<String>,
}

/// A field discovered while walking the AcroForm tree.
struct FieldRef {
    id: Option<ObjectId>,
    name: String,
    field_type: Option<String>,
}

/// List the fully-qualified names of all AcroForm fields.
pub fn form_field_names(path: &Path) -> Result<Vec<String>> {
    let doc = Document::load(path)?;
    Ok(field_names(&doc))
}

/// Trailer `Info` metadata together with the field names.
pub fn document_info(path: &Path) -> Result<PdfDocumentInfo> {
    let doc = Document::load(path)?;
    Ok(PdfDocumentInfo {
        metadata: info_metadata(&doc),
        fields: field_names(&doc),
    })
}

/// Load `input`, set the given values on matching text fields, and save the
/// result to `output`. Unknown names are ignored; non-text fields with a
/// matching name are reported as skipped.
pub fn fill_form_fields(
    input: &Path,
    output: &Path,
    values: &BTreeMap<String, String>,
) -> Result<FillReport> {
    let mut doc = Document::load(input)?;
    let report = fill_fields(&mut doc, values)?;
    doc.save(output)?;
    Ok(report)
}

pub fn field_names(doc: &Document) -> Vec<String> {
    collect_fields(doc)
        .into_iter()
        .map(|field| field.name)
        .collect()
}

pub fn fill_fields(doc: &mut Document, values: &BTreeMap<String, String>) -> Result<FillReport> {
    let mut filled = Vec::new();
    let mut skipped = Vec::new();
    let mut touched = false;

    for field in collect_fields(doc) {
        let Some(text) = values.get(&field.name) else {
            continue;
        };
        if field.field_type.as_deref() != Some("Tx") {
            debug!("skipping non-text field {}", field.name);
            skipped.push(field.name);
            continue;
        }
        let Some(id) = field.id else {
            // Inline field dictionaries carry no object id to write through;
            // real-world forms reference their fields.
            skipped.push(field.name);
            continue;
        };
        let dict = doc.get_object_mut(id)?.as_dict_mut()?;
        dict.set(
            "V",
            Object::String(text.clone().into_bytes(), StringFormat::Literal),
        );
        // Stale appearance streams would keep showing the old value.
        dict.remove(b"AP");
        filled.push(field.name);
        touched = true;
    }

    if touched {
        set_need_appearances(doc)?;
    }
    Ok(FillReport { filled, skipped })
}

fn info_metadata(doc: &Document) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    let Ok(info) = doc
        .trailer
        .get(b"Info")
        .and_then(|obj| resolve(doc, obj))
        .and_then(Object::as_dict)
    else {
        return metadata;
    };
    for (key, value) in info.iter() {
        let key = String::from_utf8_lossy(key).into_owned();
        match value {
            Object::String(bytes, _) => {
                metadata.insert(key, String::from_utf8_lossy(bytes).into_owned());
            }
            Object::Name(name) => {
                metadata.insert(key, String::from_utf8_lossy(name).into_owned());
            }
            _ => {}
        }
    }
    metadata
}

fn collect_fields(doc: &Document) -> Vec<FieldRef> {
    let mut out = Vec::new();
    let Some(entries) = acroform_field_entries(doc) else {
        return out;
    };
    walk_fields(doc, &entries, "", None, &mut out);
    out
}

fn acroform_field_entries(doc: &Document) -> Option<Vec<Object>> {
    let root = doc.trailer.get(b"Root").ok()?;
    let catalog = resolve(doc, root).ok()?.as_dict().ok()?;
    let acroform = resolve(doc, catalog.get(b"AcroForm").ok()?)
        .ok()?
        .as_dict()
        .ok()?;
    let fields = resolve(doc, acroform.get(b"Fields").ok()?)
        .ok()?
        .as_array()
        .ok()?;
    Some(fields.clone())
}

fn walk_fields(
    doc: &Document,
    entries: &[Object],
    prefix: &str,
    inherited_type: Option<&str>,
    out: &mut Vec<FieldRef>,
) {
    for entry in entries {
        let id = entry.as_reference().ok();
        let Ok(dict) = resolve(doc, entry).and_then(Object::as_dict) else {
            continue;
        };

        let partial = dict
            .get(b"T")
            .ok()
            .and_then(|obj| obj.as_str().ok())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned());
        let full_name = match &partial {
            Some(name) if prefix.is_empty() => name.clone(),
            Some(name) => format!("{prefix}.{name}"),
            None => prefix.to_string(),
        };
        let field_type = dict
            .get(b"FT")
            .ok()
            .and_then(|obj| obj.as_name().ok())
            .map(|name| String::from_utf8_lossy(name).into_owned())
            .or_else(|| inherited_type.map(str::to_string));

        // Kids that carry their own partial name are sub-fields; kids
        // without one are just widget annotations of this field.
        let named_kids = dict
            .get(b"Kids")
            .ok()
            .and_then(|obj| resolve(doc, obj).ok())
            .and_then(|obj| obj.as_array().ok())
            .filter(|kids| {
                kids.iter().any(|kid| {
                    resolve(doc, kid)
                        .and_then(Object::as_dict)
                        .map(|d| d.has(b"T"))
                        .unwrap_or(false)
                })
            });

        if let Some(kids) = named_kids {
            let kids = kids.clone();
            walk_fields(doc, &kids, &full_name, field_type.as_deref(), out);
        } else if partial.is_some() {
            out.push(FieldRef {
                id,
                name: full_name,
                field_type,
            });
        }
    }
}

fn set_need_appearances(doc: &mut Document) -> Result<()> {
    let root_id = doc.trailer.get(b"Root")?.as_reference()?;
    let acroform = doc.get_object(root_id)?.as_dict()?.get(b"AcroForm")?;
    match acroform.as_reference() {
        Ok(acro_id) => {
            doc.get_object_mut(acro_id)?
                .as_dict_mut()?
                .set("NeedAppearances", Object::Boolean(true));
        }
        Err(_) => {
            doc.get_object_mut(root_id)?
                .as_dict_mut()?
                .get_mut(b"AcroForm")?
                .as_dict_mut()?
                .set("NeedAppearances", Object::Boolean(true));
        }
    }
    Ok(())
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> lopdf::Result<&'a Object> {
    match object.as_reference() {
        Ok(id) => doc.get_object(id),
        Err(_) => Ok(object),
    }
}
