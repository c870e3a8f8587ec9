use super::{DecodeError, DecodedResponse, FieldValue};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeMap;

/// Element of a parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Parses a document into its root element.
    pub fn parse(body: &str) -> Result<Self, DecodeError> {
        let mut reader = Reader::from_str(body);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| DecodeError(format!("invalid XML: {}", e)))?;
            match event {
                Event::Start(start) => stack.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Self::from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| DecodeError("unexpected closing tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| DecodeError(format!("invalid XML text: {}", e)))?;
                    append_text(&mut stack, &text)?;
                }
                Event::CData(data) => {
                    let raw = data.into_inner();
                    append_text(&mut stack, &String::from_utf8_lossy(&raw))?;
                }
                Event::Eof => break,
                // declaration, comments, doctype, processing instructions
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(DecodeError(format!("unclosed element <{}>", open.name)));
        }
        root.ok_or_else(|| DecodeError("document has no root element".to_string()))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, DecodeError> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| DecodeError(format!("invalid attribute on <{}>: {}", name, e)))?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| DecodeError(format!("invalid attribute on <{}>: {}", name, e)))?
                .into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn is_nil(&self) -> bool {
        matches!(self.attribute("nil"), Some("true" | "1"))
    }

    fn first_child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Children with the given name; repeated names form a list. Attributes
    /// stand in for missing children.
    fn child_value(&self, name: &str) -> Option<FieldValue> {
        let matches: Vec<&XmlElement> = self.children.iter().filter(|c| c.name == name).collect();
        match matches.as_slice() {
            [] => self
                .attribute(name)
                .map(|value| FieldValue::Scalar(value.to_string())),
            [single] => Some(single.to_value()),
            many => Some(FieldValue::List(many.iter().map(|c| c.to_value()).collect())),
        }
    }

    /// Converts the element to a format-neutral value.
    #[must_use]
    pub fn to_value(&self) -> FieldValue {
        if self.is_nil() {
            return FieldValue::Null;
        }
        if self.children.is_empty() {
            return FieldValue::Scalar(self.text.trim().to_string());
        }

        let mut fields = BTreeMap::new();
        for child in &self.children {
            if !fields.contains_key(&child.name) {
                if let Some(value) = self.child_value(&child.name) {
                    fields.insert(child.name.clone(), value);
                }
            }
        }
        FieldValue::Record(fields)
    }
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), DecodeError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(DecodeError(format!(
            "unexpected second root element <{}>",
            element.name
        ))),
    }
}

fn append_text(stack: &mut [XmlElement], text: &str) -> Result<(), DecodeError> {
    match stack.last_mut() {
        Some(element) => {
            element.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(DecodeError("text outside of the root element".to_string())),
    }
}

/// Response decoded from the XML surface. Paths start below the root element.
#[derive(Debug, Clone)]
pub struct XmlResponse {
    root: XmlElement,
}

impl XmlResponse {
    pub fn parse(body: &str) -> Result<Self, DecodeError> {
        XmlElement::parse(body).map(|root| Self { root })
    }
}

impl DecodedResponse for XmlResponse {
    fn lookup(&self, path: &[&str]) -> Option<FieldValue> {
        let (last, parents) = path.split_last()?;
        let mut node = &self.root;
        for segment in parents {
            node = node.first_child(segment)?;
        }
        node.child_value(last)
    }

    fn root_items(&self) -> Option<Vec<FieldValue>> {
        let first = self.root.children.first()?;
        self.root
            .children
            .iter()
            .all(|child| child.name == first.name)
            .then(|| self.root.children.iter().map(XmlElement::to_value).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_document() {
        let root = XmlElement::parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <createacct>
                <result>
                    <status>1</status>
                    <statusmsg>Account created &amp; ready</statusmsg>
                    <options><vp_username>exmpl_12345678</vp_username></options>
                </result>
            </createacct>"#,
        )
        .unwrap();
        assert_eq!(root.name, "createacct");

        let response = XmlResponse { root };
        assert_eq!(response.get_text("result.status").unwrap(), "1");
        assert_eq!(response.get_text("result.statusmsg").unwrap(), "Account created & ready");
        assert_eq!(response.get_text("result.options.vp_username").unwrap(), "exmpl_12345678");
    }

    #[test]
    fn test_repeated_children_form_list() {
        let response = XmlResponse::parse(
            "<listpkgs><package><name>basic</name></package><package><name>pro</name></package></listpkgs>",
        )
        .unwrap();
        let FieldValue::List(items) = response.get("package").unwrap() else {
            panic!("expected a list");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].field("name").unwrap().as_text(), Some("pro"));
        assert_eq!(response.root_items().unwrap().len(), 2);
    }

    #[test]
    fn test_nil_and_attributes() {
        let response = XmlResponse::parse(
            r#"<listpkgs xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" status="1"><package xsi:nil="true"/></listpkgs>"#,
        )
        .unwrap();
        assert_eq!(response.get("package"), Some(FieldValue::Null));
        assert_eq!(response.get_text("status").unwrap(), "1");
    }

    #[test]
    fn test_cdata() {
        let response = XmlResponse::parse("<r><error><![CDATA[bad <input>]]></error></r>").unwrap();
        assert_eq!(response.get_text("error").unwrap(), "bad <input>");
    }

    #[test]
    fn test_malformed_documents() {
        assert!(XmlElement::parse("").is_err());
        assert!(XmlElement::parse("Authentication Failed").is_err());
        assert!(XmlElement::parse("<a><b></a>").is_err());
        assert!(XmlElement::parse("<a>").is_err());
        assert!(XmlElement::parse("<a/><b/>").is_err());
    }
}
