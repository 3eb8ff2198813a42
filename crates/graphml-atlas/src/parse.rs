// crates/graphml-atlas/src/parse.rs
//
// quick-xml 0.38 reader for GraphML documents.
// - Builds a small element tree with resolved namespaces
// - Locates <graph> by trying lookup strategies in order (namespaced, then unqualified)
// - Exposes <node>/<edge> children as handles with their ordered <data> entries
//
// Text policy follows the usual XML element model:
// - an element's value is the text before its first child element
// - text is kept exactly (no trimming); numeric parsing trims on its own
// - a <data> element with no text has no value, not an empty one
// - entity and character references are resolved inline

use crate::config::ConvertOptions;
use crate::error::{ConvertError, ConvertResult};
use quick_xml::NsReader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str;

/// One XML element with its namespace resolved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub namespace: Option<String>,
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// How a child element name is matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Local name bound to this namespace URI.
    Namespaced(String),
    /// Local name with no namespace at all.
    Unqualified,
}

impl Lookup {
    pub fn matches(&self, element: &XmlElement, local_name: &str) -> bool {
        if element.name != local_name {
            return false;
        }
        match self {
            Lookup::Namespaced(uri) => element.namespace.as_deref() == Some(uri.as_str()),
            Lookup::Unqualified => element.namespace.is_none(),
        }
    }
}

/// Returns the children matched by the first lookup that matches any.
pub fn find_children<'e>(
    parent: &'e XmlElement,
    local_name: &str,
    lookups: &[Lookup],
) -> Vec<&'e XmlElement> {
    for lookup in lookups {
        let found: Vec<&XmlElement> = parent
            .children
            .iter()
            .filter(|c| lookup.matches(c, local_name))
            .collect();
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

fn find_child_index(parent: &XmlElement, local_name: &str, lookups: &[Lookup]) -> Option<usize> {
    lookups.iter().find_map(|lookup| {
        parent
            .children
            .iter()
            .position(|c| lookup.matches(c, local_name))
    })
}

/// Which kind of element a `<key>` declaration applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Node,
    Edge,
}

impl ElementKind {
    fn as_str(self) -> &'static str {
        match self {
            ElementKind::Node => "node",
            ElementKind::Edge => "edge",
        }
    }
}

#[derive(Debug, Clone)]
struct KeyDeclaration {
    domain: String,
    name: String,
}

/// `<key id=".." for=".." attr.name=".."/>` declarations of the document.
#[derive(Debug, Clone, Default)]
pub struct KeyDeclarations {
    by_id: BTreeMap<String, Vec<KeyDeclaration>>,
}

impl KeyDeclarations {
    fn collect(root: &XmlElement, lookups: &[Lookup]) -> Self {
        let mut by_id: BTreeMap<String, Vec<KeyDeclaration>> = BTreeMap::new();
        for key in find_children(root, "key", lookups) {
            let (Some(id), Some(name)) = (key.attribute("id"), key.attribute("attr.name")) else {
                continue;
            };
            by_id.entry(id.to_string()).or_default().push(KeyDeclaration {
                domain: key.attribute("for").unwrap_or("all").to_string(),
                name: name.to_string(),
            });
        }
        KeyDeclarations { by_id }
    }

    /// Declared attribute name for `key` on `kind`, or `key` itself.
    pub fn resolve<'a>(&'a self, kind: ElementKind, key: &'a str) -> &'a str {
        self.by_id
            .get(key)
            .and_then(|decls| {
                decls
                    .iter()
                    .find(|d| d.domain == kind.as_str() || d.domain == "all")
            })
            .map(|d| d.name.as_str())
            .unwrap_or(key)
    }

    /// Number of distinct declared key ids.
    pub fn count(&self) -> usize {
        self.by_id.len()
    }
}

/// A typed `<data key="..">value</data>` entry. `value` is `None` for an
/// element without text, such as `<data key="label"/>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataEntry<'a> {
    pub key: &'a str,
    pub value: Option<&'a str>,
}

impl<'a> DataEntry<'a> {
    pub fn text(&self) -> &'a str {
        self.value.unwrap_or_default()
    }
}

/// A `<node>` or `<edge>` element with its data entries in source order.
#[derive(Debug, Clone)]
pub struct GraphElement<'a> {
    element: &'a XmlElement,
    data: Vec<DataEntry<'a>>,
}

impl<'a> GraphElement<'a> {
    pub fn id(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }

    /// Plain XML attribute of the element itself (e.g. `source`).
    pub fn attribute(&self, key: &str) -> Option<&'a str> {
        self.element.attribute(key)
    }

    pub fn data(&self) -> &[DataEntry<'a>] {
        &self.data
    }

    /// First data entry with this key.
    pub fn data_entry(&self, key: &str) -> Option<DataEntry<'a>> {
        self.data.iter().find(|d| d.key == key).copied()
    }
}

/// The located `<graph>` element plus what is needed to read its children.
#[derive(Debug, Clone)]
pub struct ParsedGraph {
    graph: XmlElement,
    lookups: Vec<Lookup>,
    keys: Option<KeyDeclarations>,
}

impl ParsedGraph {
    pub fn graph(&self) -> &XmlElement {
        &self.graph
    }

    pub fn key_declarations(&self) -> Option<&KeyDeclarations> {
        self.keys.as_ref()
    }

    pub fn nodes(&self) -> impl Iterator<Item = GraphElement<'_>> {
        self.elements("node", ElementKind::Node)
    }

    pub fn edges(&self) -> impl Iterator<Item = GraphElement<'_>> {
        self.elements("edge", ElementKind::Edge)
    }

    fn elements(
        &self,
        local_name: &str,
        kind: ElementKind,
    ) -> impl Iterator<Item = GraphElement<'_>> {
        find_children(&self.graph, local_name, &self.lookups)
            .into_iter()
            .map(move |element| GraphElement {
                element,
                data: self.data_entries(element, kind),
            })
    }

    fn data_entries<'a>(&'a self, element: &'a XmlElement, kind: ElementKind) -> Vec<DataEntry<'a>> {
        find_children(element, "data", &self.lookups)
            .into_iter()
            .filter_map(|data| {
                let key = data.attribute("key")?;
                let key = match &self.keys {
                    Some(keys) => keys.resolve(kind, key),
                    None => key,
                };
                Some(DataEntry {
                    key,
                    value: Some(data.text.as_str()).filter(|text| !text.is_empty()),
                })
            })
            .collect()
    }
}

/// Locates the `<graph>` element of a GraphML document.
#[derive(Debug, Clone)]
pub struct GraphParser {
    lookups: Vec<Lookup>,
    resolve_key_declarations: bool,
}

impl GraphParser {
    pub fn new(options: &ConvertOptions) -> Self {
        GraphParser {
            lookups: vec![
                Lookup::Namespaced(options.namespace.clone()),
                Lookup::Unqualified,
            ],
            resolve_key_declarations: options.resolve_key_declarations,
        }
    }

    pub fn lookups(&self) -> &[Lookup] {
        &self.lookups
    }

    pub fn parse_str(&self, xml: &str) -> ConvertResult<ParsedGraph> {
        self.locate(read_tree(NsReader::from_str(xml))?)
    }

    pub fn parse_reader<R: BufRead>(&self, reader: R) -> ConvertResult<ParsedGraph> {
        self.locate(read_tree(NsReader::from_reader(reader))?)
    }

    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> ConvertResult<ParsedGraph> {
        let file = File::open(path)?;
        self.parse_reader(BufReader::new(file))
    }

    fn locate(&self, mut root: XmlElement) -> ConvertResult<ParsedGraph> {
        let idx = find_child_index(&root, "graph", &self.lookups).ok_or_else(|| {
            ConvertError::Structure("could not find graph element in GraphML file".into())
        })?;
        let keys = self
            .resolve_key_declarations
            .then(|| KeyDeclarations::collect(&root, &self.lookups));
        let graph = root.children.swap_remove(idx);
        Ok(ParsedGraph {
            graph,
            lookups: self.lookups.clone(),
            keys,
        })
    }
}

/// Reads a whole document into an element tree and returns its root.
pub fn read_tree<R: BufRead>(mut reader: NsReader<R>) -> ConvertResult<XmlElement> {
    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let (resolved, event) = reader.read_resolved_event_into(&mut buf)?;
        let namespace = match resolved {
            ResolveResult::Bound(Namespace(uri)) => Some(str::from_utf8(uri)?.to_string()),
            _ => None,
        };

        match event {
            Event::Start(e) => stack.push(element_from_start(namespace, &e)?),
            Event::Empty(e) => {
                let element = element_from_start(namespace, &e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    ConvertError::Structure("closing tag without open element".into())
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(t) => append_text(&mut stack, &t.decode()?),
            Event::CData(c) => append_text(&mut stack, &c.decode()?),
            Event::GeneralRef(r) => append_text(&mut stack, &resolve_reference(&r)?),
            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ConvertError::Structure(format!(
            "unclosed element <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| ConvertError::Structure("no root element found".into()))
}

fn element_from_start(namespace: Option<String>, e: &BytesStart<'_>) -> ConvertResult<XmlElement> {
    Ok(XmlElement {
        namespace,
        name: str::from_utf8(e.local_name().as_ref())?.to_string(),
        attributes: attrs_to_map(e)?,
        text: String::new(),
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> ConvertResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(ConvertError::Structure("multiple root elements".into()));
    }
    Ok(())
}

fn append_text(stack: &mut [XmlElement], txt: &str) {
    // Text after the first child is tail text, not the element's value.
    if let Some(top) = stack.last_mut()
        && top.children.is_empty()
    {
        top.text.push_str(txt);
    }
}

fn resolve_reference(r: &BytesRef<'_>) -> ConvertResult<String> {
    if let Some(ch) = r
        .resolve_char_ref()
        .map_err(|e| ConvertError::Structure(format!("invalid character reference: {e}")))?
    {
        return Ok(ch.to_string());
    }
    let name = r.decode()?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| ConvertError::Structure(format!("unknown entity reference &{name};")))
}

fn attrs_to_map(e: &BytesStart<'_>) -> ConvertResult<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    for a in e.attributes() {
        let a = a?;
        let key = str::from_utf8(a.key.as_ref())?.to_string();
        let val = a.unescape_value()?.to_string();
        out.insert(key, val);
    }
    Ok(out)
}
