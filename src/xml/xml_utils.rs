use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::Decimal;
use std::io::Cursor;

use crate::core::OrderError;

pub type XmlResult = Result<String, OrderError>;

fn xml_io(e: std::io::Error) -> OrderError {
    OrderError::Xml(format!("XML write error: {e}"))
}

pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Result<Self, OrderError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    pub fn into_string(self) -> Result<String, OrderError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| OrderError::Xml(format!("XML UTF-8 error: {e}")))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, OrderError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    /// Start an element; attributes with an empty value are left out.
    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, OrderError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs.iter().filter(|(_, v)| !v.is_empty()) {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, OrderError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, OrderError> {
        self.text_element_with_attrs(name, text, &[])
    }

    pub fn text_element_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, OrderError> {
        self.start_element_with_attrs(name, attrs)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    /// Write a decimal amount with an optional currencyID attribute.
    pub fn amount_element(
        &mut self,
        name: &str,
        amount: Decimal,
        currency: &str,
        decimals: u32,
    ) -> Result<&mut Self, OrderError> {
        self.text_element_with_attrs(
            name,
            &format_decimal(amount, decimals),
            &[("currencyID", currency)],
        )
    }

    /// Write a quantity or measure with an optional unitCode attribute.
    pub fn quantity_element(
        &mut self,
        name: &str,
        qty: Decimal,
        unit: &str,
        decimals: u32,
    ) -> Result<&mut Self, OrderError> {
        self.text_element_with_attrs(name, &format_decimal(qty, decimals), &[("unitCode", unit)])
    }
}

/// Format a Decimal for XML output: at least `min_decimals` places, trailing
/// zeros beyond that stripped.
pub fn format_decimal(d: Decimal, min_decimals: u32) -> String {
    let s = d.normalize().to_string();
    let min = min_decimals as usize;
    match s.find('.') {
        Some(dot_pos) => {
            let decimals = s.len() - dot_pos - 1;
            if decimals < min {
                format!("{s}{}", "0".repeat(min - decimals))
            } else {
                s
            }
        }
        None if min == 0 => s,
        None => format!("{s}.{}", "0".repeat(min)),
    }
}

/// A parsed XML element, keyed by local name (namespace prefixes dropped).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Parse a whole document into its root element.
    pub fn parse(xml: &str) -> Result<XmlElement, OrderError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => stack.push(Self::open(e)?),
                Ok(Event::Empty(ref e)) => {
                    let elem = Self::open(e)?;
                    Self::attach(&mut stack, &mut root, elem);
                }
                Ok(Event::Text(ref e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| OrderError::Xml(format!("XML parse error: {e}")))?;
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&text);
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
                Ok(Event::End(_)) => {
                    let elem = stack
                        .pop()
                        .ok_or_else(|| OrderError::Xml("unbalanced end tag".into()))?;
                    Self::attach(&mut stack, &mut root, elem);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OrderError::Xml(format!("XML parse error: {e}"))),
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(OrderError::Xml("unexpected end of document".into()));
        }
        root.ok_or_else(|| OrderError::Xml("document has no root element".into()))
    }

    fn open(e: &BytesStart<'_>) -> Result<XmlElement, OrderError> {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        let mut attrs = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|e| OrderError::Xml(format!("XML attribute error: {e}")))?;
            if attr.key.as_ref().starts_with(b"xmlns") {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| OrderError::Xml(format!("XML attribute error: {e}")))?;
            attrs.push((key, value.into_owned()));
        }
        Ok(XmlElement {
            name,
            attrs,
            ..Default::default()
        })
    }

    fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, elem: XmlElement) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(elem),
            None => *root = Some(elem),
        }
    }

    /// First child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given local name, in document order.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Descend through a chain of local names.
    pub fn path(&self, names: &[&str]) -> Option<&XmlElement> {
        names.iter().try_fold(self, |elem, name| elem.child(name))
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Text of the named child, if present and non-empty.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str()).filter(|t| !t.is_empty())
    }
}
