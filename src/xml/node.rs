//! Owned, namespace-resolved XML tree.

use crate::err::{MappingError, Result};
use crate::mapper::MapperSettings;

use log::trace;
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use std::borrow::Cow;
use std::fmt;

/// A resolved element or attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlName {
    pub namespace: Option<String>,
    pub local: String,
}

impl XmlName {
    pub fn matches(&self, name: &QualifiedName<'_>) -> bool {
        self.local == name.local && self.namespace.as_deref() == name.namespace
    }
}

/// Clark notation, `{uri}local`.
impl fmt::Display for XmlName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{{{}}}{}", namespace, self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// A borrowed name to look up in a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifiedName<'n> {
    pub namespace: Option<&'n str>,
    pub local: &'n str,
}

impl<'n> QualifiedName<'n> {
    pub fn new(namespace: &'n str, local: &'n str) -> Self {
        QualifiedName {
            namespace: Some(namespace),
            local,
        }
    }

    pub fn local(local: &'n str) -> Self {
        QualifiedName {
            namespace: None,
            local,
        }
    }
}

impl fmt::Display for QualifiedName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace {
            Some(namespace) => write!(f, "{{{}}}{}", namespace, self.local),
            None => f.write_str(self.local),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: XmlName,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: XmlName,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Reads a whole document into a tree.
    ///
    /// The document must have exactly one root element, and may not nest
    /// deeper than [`MapperSettings::get_max_depth`].
    pub fn parse(xml: &str, settings: &MapperSettings) -> Result<XmlElement> {
        let mut reader = NsReader::from_str(xml);
        reader
            .config_mut()
            .trim_text(settings.should_trim_xml_text());

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let (resolved, event) = reader.read_resolved_event()?;
            match event {
                Event::Start(ref start) | Event::Empty(ref start) => {
                    if stack.len() >= settings.get_max_depth() {
                        return Err(MappingError::DepthLimitExceeded {
                            max_depth: settings.get_max_depth(),
                        });
                    }

                    let name = XmlName {
                        namespace: namespace_of(resolved)?,
                        local: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
                    };
                    let element = XmlElement {
                        name,
                        attributes: read_attributes(&reader, start)?,
                        children: Vec::new(),
                    };

                    if matches!(event, Event::Start(_)) {
                        stack.push(element);
                    } else {
                        attach(&mut stack, &mut root, element)?;
                    }
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| malformed("a start tag", "an end tag"))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.push_text(text.unescape()?);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current.push_text(String::from_utf8_lossy(data.as_ref()));
                    }
                }
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.last() {
            return Err(malformed("a closed document", format!("unclosed <{}>", open.name)));
        }

        let root = root.ok_or_else(|| malformed("a root element", "an empty document"))?;
        trace!("parsed XML document rooted at <{}>", root.name);
        Ok(root)
    }

    pub fn name(&self) -> &XmlName {
        &self.name
    }

    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// The first child element called `name`.
    pub fn child(&self, name: QualifiedName<'_>) -> Option<&XmlElement> {
        self.elements().find(|element| element.name.matches(&name))
    }

    /// Every child element called `name`, in document order.
    pub fn children<'a>(
        &'a self,
        name: QualifiedName<'a>,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.elements().filter(move |element| element.name.matches(&name))
    }

    pub fn attribute(&self, name: QualifiedName<'_>) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name.matches(&name))
            .map(|attribute| attribute.value.as_str())
    }

    /// Concatenation of the element's direct text children.
    pub fn text(&self) -> Cow<'_, str> {
        let mut texts = self.children.iter().filter_map(|child| match child {
            XmlNode::Text(text) => Some(text.as_str()),
            XmlNode::Element(_) => None,
        });

        match (texts.next(), texts.next()) {
            (None, _) => Cow::Borrowed(""),
            (Some(only), None) => Cow::Borrowed(only),
            (Some(first), Some(second)) => {
                let mut joined = format!("{}{}", first, second);
                texts.for_each(|text| joined.push_str(text));
                Cow::Owned(joined)
            }
        }
    }

    fn push_text(&mut self, text: Cow<'_, str>) {
        if text.is_empty() {
            return;
        }
        match self.children.last_mut() {
            Some(XmlNode::Text(previous)) => previous.push_str(&text),
            _ => self.children.push(XmlNode::Text(text.into_owned())),
        }
    }
}

fn malformed(expected: &'static str, found: impl Into<String>) -> MappingError {
    MappingError::MalformedInput {
        type_name: "XML document",
        expected,
        found: found.into(),
    }
}

fn namespace_of(resolved: ResolveResult<'_>) -> Result<Option<String>> {
    match resolved {
        ResolveResult::Bound(namespace) => {
            Ok(Some(String::from_utf8_lossy(namespace.as_ref()).into_owned()))
        }
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(malformed(
            "a declared namespace prefix",
            format!("prefix `{}`", String::from_utf8_lossy(&prefix)),
        )),
    }
}

fn read_attributes(reader: &NsReader<&[u8]>, start: &BytesStart<'_>) -> Result<Vec<XmlAttribute>> {
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        if attribute.key.as_namespace_binding().is_some() {
            continue;
        }

        let (resolved, local) = reader.resolve_attribute(attribute.key);
        let name = XmlName {
            namespace: namespace_of(resolved)?,
            local: String::from_utf8_lossy(local.as_ref()).into_owned(),
        };
        let value = attribute.unescape_value()?.into_owned();
        attributes.push(XmlAttribute { name, value });
    }
    Ok(attributes)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(malformed(
            "a single root element",
            format!("a second root <{}>", element.name),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ATOM: &str = "http://www.w3.org/2005/Atom";
    const OPDS: &str = "http://opds-spec.org/2010/catalog";

    #[test]
    fn test_parse_resolves_namespaces() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:opds="http://opds-spec.org/2010/catalog">
            <link href="/a" opds:facetGroup="Genre"/>
            <title>Catalog &amp; more</title>
        </feed>"#;

        let root = XmlElement::parse(xml, &MapperSettings::default()).unwrap();
        assert_eq!(root.name.to_string(), "{http://www.w3.org/2005/Atom}feed");
        assert!(root.attributes.is_empty());

        let link = root.child(QualifiedName::new(ATOM, "link")).unwrap();
        assert_eq!(link.attribute(QualifiedName::local("href")), Some("/a"));
        assert_eq!(
            link.attribute(QualifiedName::new(OPDS, "facetGroup")),
            Some("Genre")
        );

        let title = root.child(QualifiedName::new(ATOM, "title")).unwrap();
        assert_eq!(title.text(), "Catalog & more");
    }

    #[test]
    fn test_children_keep_document_order() {
        let xml = "<a><b>1</b><c/><b>2</b></a>";
        let root = XmlElement::parse(xml, &MapperSettings::default()).unwrap();
        let name = QualifiedName::local("b");
        let texts: Vec<_> = root.children(name).map(|b| b.text().into_owned()).collect();
        assert_eq!(texts, vec!["1", "2"]);
    }

    #[test]
    fn test_text_can_be_kept_untrimmed() {
        let xml = "<a>  padded  </a>";
        let trimmed = XmlElement::parse(xml, &MapperSettings::default()).unwrap();
        assert_eq!(trimmed.text(), "padded");

        let raw = XmlElement::parse(xml, &MapperSettings::new().trim_xml_text(false)).unwrap();
        assert_eq!(raw.text(), "  padded  ");
    }

    #[test]
    fn test_rejects_broken_documents() {
        let settings = MapperSettings::default();
        assert!(matches!(
            XmlElement::parse("", &settings),
            Err(MappingError::MalformedInput { .. })
        ));
        assert!(matches!(
            XmlElement::parse("<a/><b/>", &settings),
            Err(MappingError::MalformedInput { .. })
        ));
        assert!(XmlElement::parse("<x:a/>", &settings).is_err());
    }

    #[test]
    fn test_depth_guard() {
        let xml = "<a><a><a><a/></a></a></a>";
        assert!(XmlElement::parse(xml, &MapperSettings::new().max_depth(4)).is_ok());
        assert!(matches!(
            XmlElement::parse(xml, &MapperSettings::new().max_depth(3)),
            Err(MappingError::DepthLimitExceeded { max_depth: 3 })
        ));
    }
}
