//! `STRUCTURED-DATA = NILVALUE / 1*SD-ELEMENT`
//!
//! ```text
//! SD-ELEMENT = "[" SD-ID *(SP SD-PARAM) "]"
//! SD-PARAM   = PARAM-NAME "=" %d34 PARAM-VALUE %d34
//! ```

use bytes::BytesMut;

use crate::cursor::Cursor;
use crate::error::{Error, Invalid, Malformed};
use crate::field::{is_printable, NIL};

const MAX_NAME_LEN: usize = 32;

/// One bracketed group. Parameters keep their wire order and duplicate
/// names are kept as they are.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructuredElement {
    pub id: String,
    /// `(name, value)` pairs, values unescaped.
    pub params: Vec<(String, String)>,
}

impl StructuredElement {
    pub fn new(id: impl Into<String>) -> Self {
        StructuredElement {
            id: id.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// First value of the parameter called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value of the parameter called `name`, in wire order.
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.params
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[inline]
fn is_name_char(c: u8) -> bool {
    is_printable(c) && !matches!(c, b'=' | b']' | b'"')
}

#[inline]
fn is_id_char(c: u8) -> bool {
    is_name_char(c) && c != b'\\'
}

fn validate_name(field: &'static str, name: &str, allowed: fn(u8) -> bool) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::invalid(field, Invalid::Empty));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(Error::invalid(field, Invalid::TooLong(MAX_NAME_LEN)));
    }
    match name.chars().find(|c| !c.is_ascii() || !allowed(*c as u8)) {
        Some(c) => Err(Error::invalid(field, Invalid::NonPrintable(c))),
        None => Ok(()),
    }
}

/// Append the wire form of `elements`, `-` when there are none.
pub(crate) fn encode(elements: &[StructuredElement], dst: &mut BytesMut) -> Result<(), Error> {
    if elements.is_empty() {
        dst.extend_from_slice(NIL);
        return Ok(());
    }

    for element in elements {
        validate_name("structured data id", &element.id, is_id_char)?;
        dst.extend_from_slice(b"[");
        dst.extend_from_slice(element.id.as_bytes());

        for (name, value) in &element.params {
            validate_name("structured data param name", name, is_name_char)?;
            dst.extend_from_slice(b" ");
            dst.extend_from_slice(name.as_bytes());
            dst.extend_from_slice(b"=\"");
            escape_into(value, dst);
            dst.extend_from_slice(b"\"");
        }

        dst.extend_from_slice(b"]");
    }

    Ok(())
}

fn escape_into(value: &str, dst: &mut BytesMut) {
    let mut last = 0;
    for (idx, c) in value.bytes().enumerate() {
        if matches!(c, b'"' | b'\\' | b']') {
            dst.extend_from_slice(&value.as_bytes()[last..idx]);
            dst.extend_from_slice(&[b'\\', c]);
            last = idx + 1;
        }
    }
    dst.extend_from_slice(&value.as_bytes()[last..]);
}

/// Parse `-` or a run of adjacent elements. Stops on the first byte that
/// does not open another element.
pub(crate) fn parse(cursor: &mut Cursor<'_>) -> Result<Vec<StructuredElement>, Error> {
    if cursor.eat(b'-') {
        return Ok(Vec::new());
    }

    // 4 is RawVec::MIN_NON_ZERO_CAP
    let mut elements = Vec::with_capacity(4);
    loop {
        elements.push(parse_element(cursor)?);
        if cursor.peek() != Some(b'[') {
            break;
        }
    }

    Ok(elements)
}

// example: [exampleSDID@32473 iut="3" eventSource="Application" eventID="1011"]
fn parse_element(cursor: &mut Cursor<'_>) -> Result<StructuredElement, Error> {
    cursor.expect(b'[')?;

    let id = parse_name(cursor, is_id_char)?.ok_or_else(|| cursor.error(Malformed::EmptySdId))?;
    let mut params = Vec::new();

    loop {
        match cursor.peek() {
            Some(b']') => {
                cursor.advance(1);
                break;
            }
            Some(b' ') => {
                cursor.advance(1);
                let name = parse_name(cursor, is_name_char)?
                    .ok_or_else(|| cursor.error(Malformed::EmptyField))?;
                cursor.expect(b'=')?;
                let value = parse_param_value(cursor)?;
                params.push((name, value));
            }
            Some(_) => return Err(cursor.error(Malformed::ExpectedChar(']'))),
            None => return Err(cursor.error(Malformed::UnexpectedEndOfInput)),
        }
    }

    Ok(StructuredElement { id, params })
}

/// SD-NAME, `None` when empty. SD-IDs additionally exclude `\\`.
fn parse_name(cursor: &mut Cursor<'_>, allowed: fn(u8) -> bool) -> Result<Option<String>, Error> {
    let start = cursor.position();
    let name = cursor.take_while(allowed);
    if name.len() > MAX_NAME_LEN {
        return Err(cursor.error_at(start, Malformed::FieldTooLong(MAX_NAME_LEN)));
    }
    if name.is_empty() {
        return Ok(None);
    }
    Ok(Some(name.iter().map(|&c| c as char).collect()))
}

/// Parse a `param_value`... a.k.a. a quoted string. A backslash takes the
/// next byte literally.
fn parse_param_value(cursor: &mut Cursor<'_>) -> Result<String, Error> {
    cursor.expect(b'"')?;
    let start = cursor.position();

    let mut value = Vec::new();
    let mut escaped = false;
    loop {
        let Some(c) = cursor.peek() else {
            return Err(cursor.error_at(start, Malformed::UnterminatedValue));
        };
        cursor.advance(1);

        if escaped {
            value.push(c);
            escaped = false;
        } else if c == b'\\' {
            escaped = true;
        } else if c == b'"' {
            break;
        } else {
            value.push(c);
        }
    }

    String::from_utf8(value).map_err(|_| cursor.error_at(start, Malformed::InvalidUtf8))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(input: &str) -> Result<(Vec<StructuredElement>, &str), Error> {
        let mut cursor = Cursor::new(input.as_bytes());
        let elements = parse(&mut cursor)?;
        let rest = std::str::from_utf8(cursor.remaining()).unwrap();
        Ok((elements, rest))
    }

    fn encode_str(elements: &[StructuredElement]) -> Result<String, Error> {
        let mut dst = BytesMut::new();
        encode(elements, &mut dst)?;
        Ok(String::from_utf8(dst.to_vec()).unwrap())
    }

    #[test]
    fn nil() {
        assert_eq!(parse_str("- msg").unwrap(), (vec![], " msg"));
        assert_eq!(encode_str(&[]).unwrap(), "-");
    }

    #[test]
    fn single_element() {
        let (elements, rest) = parse_str(
            r#"[exampleSDID@32473 iut="3" eventSource="Application" eventID="1011"] BOM"#,
        )
        .unwrap();
        assert_eq!(rest, " BOM");
        assert_eq!(
            elements,
            vec![StructuredElement::new("exampleSDID@32473")
                .with_param("iut", "3")
                .with_param("eventSource", "Application")
                .with_param("eventID", "1011")]
        );
    }

    #[test]
    fn multiple_structured_data() {
        let input = "[exampleSDID@32473 iut=\"3\" eventSource=\"Application\"][examplePriority@32473 class=\"high\"] BOMAn application event log entry...";

        let (elements, rest) = parse_str(input).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[1].get("class"), Some("high"));
        assert_eq!(rest, " BOMAn application event log entry...");
    }

    #[test]
    fn empty_element() {
        let (elements, rest) = parse_str("[meta@1234]").unwrap();
        assert_eq!(elements, vec![StructuredElement::new("meta@1234")]);
        assert_eq!(rest, "");
    }

    #[test]
    fn escapes() {
        let (elements, _) = parse_str(r#"[meta key="val\"ue" path="C:\\dir" br="a\]b" odd="\x"]"#)
            .unwrap();
        let meta = &elements[0];
        assert_eq!(meta.get("key"), Some(r#"val"ue"#));
        assert_eq!(meta.get("path"), Some(r"C:\dir"));
        assert_eq!(meta.get("br"), Some("a]b"));
        assert_eq!(meta.get("odd"), Some("x"));

        let element = StructuredElement::new("meta").with_param("v", r#"a"b\c]d"#);
        let encoded = encode_str(&[element.clone()]).unwrap();
        assert_eq!(encoded, r#"[meta v="a\"b\\c\]d"]"#);
        assert_eq!(parse_str(&encoded).unwrap().0, vec![element]);
    }

    #[test]
    fn backslash_allowed_in_param_name() {
        let (elements, _) = parse_str(r#"[meta n\m="v"]"#).unwrap();
        assert_eq!(elements[0].get(r"n\m"), Some("v"));
        assert_eq!(encode_str(&elements).unwrap(), r#"[meta n\m="v"]"#);
    }

    #[test]
    fn get_outlives_name() {
        let element = StructuredElement::new("meta").with_param("k", "v");
        let value = {
            let name = String::from("k");
            element.get(&name)
        };
        assert_eq!(value, Some("v"));
    }

    #[test]
    fn duplicates_are_kept() {
        let (elements, _) = parse_str(r#"[meta a="1" a="2" b=""]"#).unwrap();
        let values: Vec<_> = elements[0].values("a").collect();
        assert_eq!(values, ["1", "2"]);
        assert_eq!(elements[0].get("b"), Some(""));
    }

    #[test]
    fn unicode_value() {
        let (elements, _) = parse_str("[meta name=\"caf\u{e9}\"]").unwrap();
        assert_eq!(elements[0].get("name"), Some("caf\u{e9}"));
    }

    #[test]
    fn rejects() {
        for input in [
            "[]",
            "[ a=\"1\"]",
            "[meta",
            "[meta a=\"1\"",
            "[meta a=\"1]",
            "[meta a=1]",
            "[meta a]",
            "[meta =\"1\"]",
            "[meta  a=\"1\"]",
            "[meta\ta=\"1\"]",
            r#"[a\b x="1"]"#,
            "meta",
            "",
        ] {
            let err = parse_str(input).unwrap_err();
            assert!(err.is_malformed(), "input: {input:?}, err: {err}");
        }

        assert_eq!(
            parse_str("[meta a=\"1]").unwrap_err(),
            Error::MalformedMessage {
                offset: 9,
                kind: Malformed::UnterminatedValue
            }
        );
        assert_eq!(
            parse_str(r#"[a\b x="1"]"#).unwrap_err(),
            Error::MalformedMessage {
                offset: 2,
                kind: Malformed::ExpectedChar(']')
            }
        );
        assert_eq!(
            parse_str("[]").unwrap_err(),
            Error::MalformedMessage {
                offset: 1,
                kind: Malformed::EmptySdId
            }
        );
    }

    #[test]
    fn encode_rejects_bad_names() {
        for element in [
            StructuredElement::new(""),
            StructuredElement::new("my id"),
            StructuredElement::new("a]"),
            StructuredElement::new(r"a\b").with_param("n", "v"),
            StructuredElement::new("x".repeat(33)),
            StructuredElement::new("meta").with_param("a=b", "1"),
            StructuredElement::new("meta").with_param("", "1"),
        ] {
            assert!(encode_str(&[element]).unwrap_err().is_invalid_value());
        }
    }
}
