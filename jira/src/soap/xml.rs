//! Minimal SOAP 1.1 (rpc/encoded) reading and writing on top of `quick-xml`.
use std::collections::HashMap;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::{JiraError, Result};

pub const JIRA_NAMESPACE: &str = "http://soap.rpc.jira.atlassian.com";
pub const BEANS_NAMESPACE: &str = "http://beans.soap.rpc.jira.atlassian.com";
const ENVELOPE_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const ENCODING_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/encoding/";

// Nesting allowed while inlining multiRef references
const MAX_REF_DEPTH: usize = 16;

/// An element with namespace prefixes stripped from its own and its attributes' names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Parses a complete document and returns its root element
    pub fn parse(xml: &str) -> Result<Element> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut stack = vec![Element::default()];
        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Element::open(&start)?),
                Event::Empty(start) => {
                    let element = Element::open(&start)?;
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(element);
                    }
                }
                Event::End(_) => {
                    if stack.len() > 1 {
                        if let Some(element) = stack.pop() {
                            if let Some(parent) = stack.last_mut() {
                                parent.children.push(element);
                            }
                        }
                    }
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text.unescape()?);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        stack
            .into_iter()
            .next()
            .and_then(|document| document.children.into_iter().next())
            .ok_or_else(|| JiraError::SoapFault("Empty response from the SOAP service".to_string()))
    }

    fn open(start: &BytesStart<'_>) -> Result<Element> {
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
            attributes.push((key, attribute.unescape_value()?.into_owned()));
        }
        Ok(Element {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            attributes,
            ..Default::default()
        })
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.attribute("nil") == Some("true")
    }

    /// Trimmed text of a child element, `None` when it is absent or nil
    #[must_use]
    pub fn field(&self, name: &str) -> Option<String> {
        self.child(name)
            .filter(|c| !c.is_nil())
            .map(|c| c.text.trim().to_string())
    }

    /// Like [`Element::field`], absent and nil read as an empty string
    #[must_use]
    pub fn text_field(&self, name: &str) -> String {
        self.field(name).unwrap_or_default()
    }

    #[must_use]
    pub fn bool_field(&self, name: &str) -> bool {
        self.field(name).is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    // Replaces every `href="#id"` element by the content of the multiRef it points to
    fn inline(mut self, refs: &HashMap<String, Element>, depth: usize) -> Element {
        if depth < MAX_REF_DEPTH {
            if let Some(target) = self
                .attribute("href")
                .and_then(|href| href.strip_prefix('#'))
                .and_then(|id| refs.get(id))
            {
                self.attributes = target.attributes.clone();
                self.text = target.text.clone();
                self.children = target.children.clone();
            }
            self.children = self
                .children
                .into_iter()
                .map(|c| c.inline(refs, depth + 1))
                .collect();
        }
        self
    }
}

/// The value returned by an operation: the first child of the response element,
/// with multiRef references resolved. Void operations give an empty element.
///
/// # Errors
/// A `Fault` in the body becomes `JiraError::SoapFault` carrying the `faultstring`
pub fn return_value(xml: &str) -> Result<Element> {
    let envelope = Element::parse(xml)?;
    let body = envelope
        .child("Body")
        .ok_or_else(|| JiraError::SoapFault("SOAP response has no Body".to_string()))?;

    if let Some(fault) = body.child("Fault") {
        let message = fault
            .field("faultstring")
            .or_else(|| fault.field("faultcode"))
            .unwrap_or_else(|| "Unknown SOAP fault".to_string());
        return Err(JiraError::SoapFault(message));
    }

    let refs: HashMap<String, Element> = body
        .children
        .iter()
        .filter(|c| c.name == "multiRef")
        .filter_map(|c| c.attribute("id").map(|id| (id.to_string(), c.clone())))
        .collect();

    Ok(body
        .children
        .iter()
        .find(|c| c.name != "multiRef")
        .and_then(|response| response.children.first())
        .cloned()
        .unwrap_or_default()
        .inline(&refs, 0))
}

/// A parameter of an operation call
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bool(bool),
    Int(i64),
    /// A bean, typed as `beans:<type>`
    Struct(&'static str, Vec<(&'static str, Value)>),
    /// An encoded array of beans of the given type
    Array(&'static str, Vec<Value>),
    Nil,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Option<String>> for Value {
    fn from(value: Option<String>) -> Self {
        value.map_or(Value::Nil, Value::Str)
    }
}

/// Renders the request envelope, parameters named `in0..inN` in order
#[must_use]
pub fn envelope(operation: &str, params: &[Value]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="utf-8"?><soapenv:Envelope xmlns:soapenv="{ENVELOPE_NAMESPACE}" xmlns:soapenc="{ENCODING_NAMESPACE}" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:jira="{JIRA_NAMESPACE}" xmlns:beans="{BEANS_NAMESPACE}"><soapenv:Body><jira:{operation} soapenv:encodingStyle="{ENCODING_NAMESPACE}">"#
    );
    for (i, param) in params.iter().enumerate() {
        render(&mut xml, &format!("in{i}"), param);
    }
    xml.push_str(&format!("</jira:{operation}></soapenv:Body></soapenv:Envelope>"));
    xml
}

fn render(xml: &mut String, name: &str, value: &Value) {
    match value {
        Value::Str(s) => xml.push_str(&format!(r#"<{name} xsi:type="xsd:string">{}</{name}>"#, escape(s))),
        Value::Bool(b) => xml.push_str(&format!(r#"<{name} xsi:type="xsd:boolean">{b}</{name}>"#)),
        Value::Int(i) => xml.push_str(&format!(r#"<{name} xsi:type="xsd:int">{i}</{name}>"#)),
        Value::Nil => xml.push_str(&format!(r#"<{name} xsi:nil="true"/>"#)),
        Value::Struct(bean, fields) => {
            xml.push_str(&format!(r#"<{name} xsi:type="beans:{bean}">"#));
            for (field, value) in fields {
                render(xml, field, value);
            }
            xml.push_str(&format!("</{name}>"));
        }
        Value::Array(bean, items) => {
            xml.push_str(&format!(
                r#"<{name} xsi:type="soapenc:Array" soapenc:arrayType="beans:{bean}[{}]">"#,
                items.len()
            ));
            for item in items {
                render(xml, "item", item);
            }
            xml.push_str(&format!("</{name}>"));
        }
    }
}
