//! The path language fields use to point into an XML element.
//!
//! ```text
//! selector := step ("/" step)*
//! step     := prefix ":" local | local        child elements
//!           | "@" prefix ":" local | "@" local  attribute (last step only)
//!           | "text()"                          text content (last step only)
//! ```
//!
//! Prefixes resolve through the owning type's namespace table. An unprefixed
//! element step uses the default namespace (the `""` prefix) when the table
//! declares one; an unprefixed attribute never has a namespace.

use crate::xml::node::{QualifiedName, XmlElement};

use std::borrow::Cow;

/// A node matched by a selector.
#[derive(Debug, Clone, PartialEq)]
pub enum Hit<'a> {
    Element(&'a XmlElement),
    /// An attribute value, kept exactly as written.
    Attribute(&'a str),
    Text(Cow<'a, str>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Element(QualifiedName<'static>),
    Attribute(QualifiedName<'static>),
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: &'static str,
    steps: Vec<Step>,
}

impl Selector {
    pub fn compile(
        source: &'static str,
        resolve: impl Fn(&str) -> Option<&'static str>,
    ) -> Result<Selector, String> {
        let raw_steps: Vec<&'static str> = source.split('/').collect();
        let last = raw_steps.len() - 1;
        let mut steps = Vec::with_capacity(raw_steps.len());

        for (position, raw) in raw_steps.into_iter().enumerate() {
            let step = if raw == "text()" {
                Step::Text
            } else if let Some(attribute) = raw.strip_prefix('@') {
                Step::Attribute(qualify(source, attribute, &resolve, false)?)
            } else {
                Step::Element(qualify(source, raw, &resolve, true)?)
            };

            if position != last && !matches!(step, Step::Element(_)) {
                return Err(format!(
                    "selector `{}`: `{}` may only appear as the last step",
                    source, raw
                ));
            }
            steps.push(step);
        }

        Ok(Selector { source, steps })
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    /// The element name of a single-step element selector.
    pub(crate) fn as_root(&self) -> Result<QualifiedName<'static>, String> {
        match self.steps.as_slice() {
            [Step::Element(name)] => Ok(*name),
            _ => Err(format!(
                "root selector `{}` must name exactly one element",
                self.source
            )),
        }
    }

    /// Every node `element` reaches through this selector, in document order.
    pub fn select<'a>(&self, element: &'a XmlElement) -> Vec<Hit<'a>> {
        let mut current = vec![element];

        for step in &self.steps {
            match step {
                Step::Element(name) => {
                    current = current
                        .into_iter()
                        .flat_map(|parent| parent.children(*name))
                        .collect();
                }
                Step::Attribute(name) => {
                    return current
                        .into_iter()
                        .filter_map(|parent| parent.attribute(*name))
                        .map(Hit::Attribute)
                        .collect();
                }
                Step::Text => {
                    return current
                        .into_iter()
                        .map(|parent| Hit::Text(parent.text()))
                        .collect();
                }
            }
        }

        current.into_iter().map(Hit::Element).collect()
    }
}

fn qualify(
    source: &str,
    name: &'static str,
    resolve: &impl Fn(&str) -> Option<&'static str>,
    default_namespace: bool,
) -> Result<QualifiedName<'static>, String> {
    match name.split_once(':') {
        Some((prefix, local)) if !prefix.is_empty() && is_name(local) => resolve(prefix)
            .map(|namespace| QualifiedName::new(namespace, local))
            .ok_or_else(|| {
                format!(
                    "selector `{}` uses undeclared namespace prefix `{}`",
                    source, prefix
                )
            }),
        None if is_name(name) => Ok(QualifiedName {
            namespace: if default_namespace { resolve("") } else { None },
            local: name,
        }),
        _ => Err(format!("selector `{}` has an invalid step `{}`", source, name)),
    }
}

fn is_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(':')
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::MapperSettings;
    use pretty_assertions::assert_eq;

    const OPDS: &str = "http://opds-spec.org/2010/catalog";

    fn resolve(prefix: &str) -> Option<&'static str> {
        match prefix {
            "opds" => Some(OPDS),
            _ => None,
        }
    }

    fn document() -> XmlElement {
        let xml = r#"<link xmlns:opds="http://opds-spec.org/2010/catalog" href="/buy">
            <opds:price currencycode="USD">9.99</opds:price>
            <opds:indirectAcquisition type="text/html">
                <opds:indirectAcquisition type="application/epub+zip"/>
            </opds:indirectAcquisition>
            <opds:indirectAcquisition type="application/pdf"/>
        </link>"#;
        XmlElement::parse(xml, &MapperSettings::default()).unwrap()
    }

    #[test]
    fn test_select_attributes_and_text() {
        let root = document();

        let href = Selector::compile("@href", resolve).unwrap();
        assert_eq!(root_texts(&href, &root), vec!["/buy"]);

        let price = Selector::compile("opds:price/text()", resolve).unwrap();
        assert_eq!(root_texts(&price, &root), vec!["9.99"]);

        let currency = Selector::compile("opds:price/@currencycode", resolve).unwrap();
        assert_eq!(root_texts(&currency, &root), vec!["USD"]);
    }

    #[test]
    fn test_select_repeated_children_in_order() {
        let root = document();
        let selector = Selector::compile("opds:indirectAcquisition/@type", resolve).unwrap();
        assert_eq!(
            root_texts(&selector, &root),
            vec!["text/html", "application/pdf"]
        );

        let nested = Selector::compile(
            "opds:indirectAcquisition/opds:indirectAcquisition",
            resolve,
        )
        .unwrap();
        assert_eq!(nested.select(&root).len(), 1);
    }

    #[test]
    fn test_compile_rejects_bad_selectors() {
        assert!(Selector::compile("dc:title", resolve).is_err());
        assert!(Selector::compile("@href/opds:price", resolve).is_err());
        assert!(Selector::compile("text()/a", resolve).is_err());
        assert!(Selector::compile("a//b", resolve).is_err());
        assert!(Selector::compile("", resolve).is_err());
    }

    #[test]
    fn test_root_selector_is_one_element() {
        let root = Selector::compile("opds:feed", resolve).unwrap().as_root().unwrap();
        assert_eq!(root, QualifiedName::new(OPDS, "feed"));
        assert!(Selector::compile("@a", resolve).unwrap().as_root().is_err());
    }

    fn root_texts(selector: &Selector, root: &XmlElement) -> Vec<String> {
        selector
            .select(root)
            .into_iter()
            .map(|hit| match hit {
                Hit::Text(text) => text.into_owned(),
                Hit::Attribute(value) => value.to_owned(),
                Hit::Element(element) => element.text().into_owned(),
            })
            .collect()
    }
}
