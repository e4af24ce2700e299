use rstest::rstest;
use savestream::xml::{Namespaces, ParserContext, ReaderOptions};
use savestream::{Error, ErrorKind, XmlStreamSerializer};

use crate::utility::{SAVE_DATA_MARKUP, SaveData, Settings, from_bytes, save_data, to_bytes};

fn in_namespace(uri: &str) -> XmlStreamSerializer {
    XmlStreamSerializer::new().with_namespaces(Namespaces::new().add("", uri))
}

#[test]
fn deserialize_compact() -> Result<(), Error> {
    let value = from_bytes::<_, SaveData>(&XmlStreamSerializer::new(), SAVE_DATA_MARKUP.as_bytes())?;
    assert_eq!(value, Some(save_data()));
    Ok(())
}

#[rstest]
#[case::empty("")]
#[case::whitespace("  \n\t")]
#[case::declaration_only(r#"<?xml version="1.0" encoding="UTF-8"?>"#)]
#[case::comment_only("<!-- nothing saved yet -->")]
fn document_without_root_is_absent(#[case] document: &str) -> Result<(), Error> {
    assert_eq!(from_bytes::<_, SaveData>(&XmlStreamSerializer::new(), document.as_bytes())?, None);
    Ok(())
}

#[test]
fn other_root_element_is_absent() -> Result<(), Error> {
    let bytes = to_bytes(&XmlStreamSerializer::new(), Some(&Settings { volume: 3, fullscreen: true }))?;
    assert_eq!(from_bytes::<_, SaveData>(&XmlStreamSerializer::new(), &bytes)?, None);
    Ok(())
}

#[test]
fn other_namespace_is_absent() -> Result<(), Error> {
    let bytes = to_bytes(&in_namespace("urn:game:v1"), Some(&save_data()))?;
    assert_eq!(from_bytes::<_, SaveData>(&in_namespace("urn:game:v2"), &bytes)?, None);
    assert_eq!(from_bytes::<_, SaveData>(&XmlStreamSerializer::new(), &bytes)?, None);
    assert_eq!(from_bytes::<_, SaveData>(&in_namespace("urn:game:v1"), &bytes)?, Some(save_data()));
    Ok(())
}

#[test]
fn namespaced_document_needs_namespace() -> Result<(), Error> {
    let bytes = to_bytes(&XmlStreamSerializer::new(), Some(&save_data()))?;
    assert_eq!(from_bytes::<_, SaveData>(&in_namespace("urn:game:v1"), &bytes)?, None);
    Ok(())
}

#[test]
fn prefixed_root_element() -> Result<(), Error> {
    let document = SAVE_DATA_MARKUP
        .replacen("<SaveData ", r#"<s:SaveData xmlns:s="urn:game:v1" "#, 1)
        .replace("</SaveData>", "</s:SaveData>");
    assert_eq!(from_bytes::<_, SaveData>(&in_namespace("urn:game:v1"), document.as_bytes())?, Some(save_data()));
    Ok(())
}

#[test]
fn prefix_bound_by_parser_context() -> Result<(), Error> {
    let document = SAVE_DATA_MARKUP.replacen("<SaveData ", "<s:SaveData ", 1).replace("</SaveData>", "</s:SaveData>");
    let context = ParserContext { namespace_scope: Namespaces::new().add("s", "urn:game:v1"), ..ParserContext::default() };
    let serializer = in_namespace("urn:game:v1").with_parser_context(context);
    assert_eq!(from_bytes::<_, SaveData>(&serializer, document.as_bytes())?, Some(save_data()));

    let err = from_bytes::<_, SaveData>(&in_namespace("urn:game:v1"), document.as_bytes()).expect_err("unbound prefix");
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
    Ok(())
}

#[test]
fn root_name_override() -> Result<(), Error> {
    let serializer = XmlStreamSerializer::new().with_root_name("save");
    let bytes = to_bytes(&serializer, Some(&save_data()))?;
    assert!(String::from_utf8_lossy(&bytes).contains(r#"<save version="2">"#));
    assert_eq!(from_bytes::<_, SaveData>(&serializer, &bytes)?, Some(save_data()));
    assert_eq!(from_bytes::<_, SaveData>(&XmlStreamSerializer::new(), &bytes)?, None);
    Ok(())
}

#[test]
fn absent_value_round_trip() -> Result<(), Error> {
    let serializer = XmlStreamSerializer::new();
    let bytes = to_bytes::<_, SaveData>(&serializer, None)?;
    assert_eq!(from_bytes::<_, SaveData>(&serializer, &bytes)?, None);
    Ok(())
}

#[rstest]
#[case::mismatched_end("<SaveData><player>Ann</SaveData>")]
#[case::unclosed(r#"<SaveData version="2"><player>Ann</player>"#)]
#[case::two_roots("<SaveData/><SaveData/>")]
#[case::text_after_root("<Settings/>garbage")]
#[case::doctype("<!DOCTYPE SaveData><SaveData/>")]
#[case::broken_attribute("<SaveData version=2/>")]
fn malformed_document_is_an_error(#[case] document: &str) {
    let err = from_bytes::<_, SaveData>(&XmlStreamSerializer::new(), document.as_bytes()).expect_err("malformed");
    assert_eq!(err.kind(), ErrorKind::MalformedInput, "{err}");
}

#[test]
fn incompatible_content_is_an_error() {
    let document = r#"<SaveData version="2"><player>Ann</player></SaveData>"#;
    let err = from_bytes::<_, SaveData>(&XmlStreamSerializer::new(), document.as_bytes()).expect_err("missing fields");
    assert_eq!(err.kind(), ErrorKind::IncompatibleShape, "{err}");
}

#[test]
fn document_size_limit() -> Result<(), Error> {
    let limited = |limit| {
        let options = ReaderOptions { max_document_bytes: Some(limit), ..ReaderOptions::default() };
        XmlStreamSerializer::new().with_reader_options(options)
    };
    let length = SAVE_DATA_MARKUP.len() as u64;
    assert_eq!(from_bytes::<_, SaveData>(&limited(length), SAVE_DATA_MARKUP.as_bytes())?, Some(save_data()));
    let err = from_bytes::<_, SaveData>(&limited(length - 1), SAVE_DATA_MARKUP.as_bytes()).expect_err("too long");
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
    Ok(())
}

#[test]
fn depth_limit() {
    let options = ReaderOptions { max_depth: Some(2), ..ReaderOptions::default() };
    let serializer = XmlStreamSerializer::new().with_reader_options(options);
    let err = from_bytes::<_, SaveData>(&serializer, SAVE_DATA_MARKUP.as_bytes()).expect_err("too deep");
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}

#[test]
fn entity_character_limit() -> Result<(), Error> {
    let limited = |limit| {
        let options = ReaderOptions { max_characters_from_entities: Some(limit), ..ReaderOptions::default() };
        XmlStreamSerializer::new().with_reader_options(options)
    };
    let value = Settings { volume: 3, fullscreen: true };
    let document = "<Settings><volume>&#x33;</volume><fullscreen>t&#x72;ue</fullscreen></Settings>";
    assert_eq!(from_bytes::<_, Settings>(&limited(2), document.as_bytes())?, Some(value));
    let err = from_bytes::<_, Settings>(&limited(1), document.as_bytes()).expect_err("too many references");
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
    Ok(())
}

#[test]
fn unnamed_type_without_root_name() {
    let err = from_bytes::<_, Vec<u32>>(&XmlStreamSerializer::new(), b"<list/>").expect_err("no root name");
    assert_eq!(err.kind(), ErrorKind::Mapping);
    assert!(matches!(err, Error::NoRootName(_)));
}
