use savestream::xml::{Namespaces, NewLineHandling, WriterOptions};
use savestream::{Error, StreamSerializer, XmlStreamSerializer};

use crate::utility::{SAVE_DATA_MARKUP, SaveData, Settings, from_bytes, save_data, to_bytes};

fn without_declaration() -> WriterOptions {
    WriterOptions { omit_xml_declaration: true, ..WriterOptions::default() }
}

#[test]
fn serialize_compact() -> Result<(), Error> {
    let serializer = XmlStreamSerializer::new().with_writer_options(without_declaration());
    let bytes = to_bytes(&serializer, Some(&save_data()))?;
    assert_eq!(String::from_utf8_lossy(&bytes), SAVE_DATA_MARKUP);
    Ok(())
}

#[test]
fn serialize_with_declaration() -> Result<(), Error> {
    let bytes = to_bytes(&XmlStreamSerializer::new(), Some(&save_data()))?;
    let expected = format!(r#"<?xml version="1.0" encoding="UTF-8"?>{SAVE_DATA_MARKUP}"#);
    assert_eq!(String::from_utf8_lossy(&bytes), expected);
    Ok(())
}

#[test]
fn serialize_indented() -> Result<(), Error> {
    let serializer = XmlStreamSerializer::new().with_writer_options(WriterOptions::indented());
    let bytes = to_bytes(&serializer, Some(&save_data()))?;
    let expected = textwrap::dedent(
        r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <SaveData version="2">
          <player>Ann</player>
          <level>7</level>
          <position>
            <x>1</x>
            <y>-3</y>
          </position>
          <inventory>
            <item name="sword" count="1"/>
            <item name="potion" count="5"/>
          </inventory>
        </SaveData>
        "#,
    );
    assert_eq!(String::from_utf8_lossy(&bytes), expected.trim());
    Ok(())
}

#[test]
fn indented_round_trip() -> Result<(), Error> {
    let serializer = XmlStreamSerializer::new().with_writer_options(WriterOptions::indented());
    let bytes = to_bytes(&serializer, Some(&save_data()))?;
    assert_eq!(from_bytes::<_, SaveData>(&serializer, &bytes)?, Some(save_data()));
    Ok(())
}

#[test]
fn serialize_with_custom_indentation() -> Result<(), Error> {
    let options = WriterOptions {
        indent_chars: "\t".into(),
        new_line_chars: "\r\n".into(),
        ..WriterOptions::indented()
    };
    let serializer = XmlStreamSerializer::new().with_writer_options(WriterOptions { omit_xml_declaration: true, ..options });
    let bytes = to_bytes(&serializer, Some(&Settings { volume: 3, fullscreen: true }))?;
    assert_eq!(bytes, b"<Settings>\r\n\t<volume>3</volume>\r\n\t<fullscreen>true</fullscreen>\r\n</Settings>");
    Ok(())
}

#[test]
fn serialize_namespaces() -> Result<(), Error> {
    let namespaces = Namespaces::new().add("", "urn:game:save").add("ext", "urn:game:extensions");
    let serializer = XmlStreamSerializer::new().with_writer_options(without_declaration()).with_namespaces(namespaces);
    let bytes = to_bytes(&serializer, Some(&Settings { volume: 3, fullscreen: false }))?;
    let expected = concat!(
        r#"<Settings xmlns="urn:game:save" xmlns:ext="urn:game:extensions">"#,
        r#"<volume>3</volume><fullscreen>false</fullscreen></Settings>"#
    );
    assert_eq!(String::from_utf8_lossy(&bytes), expected);
    assert_eq!(from_bytes::<_, Settings>(&serializer, &bytes)?, Some(Settings { volume: 3, fullscreen: false }));
    Ok(())
}

#[test]
fn serialize_absent_value() -> Result<(), Error> {
    let namespaces = Namespaces::new().add("", "urn:game:save");
    let serializer = XmlStreamSerializer::new().with_writer_options(without_declaration()).with_namespaces(namespaces);
    let bytes = to_bytes::<_, SaveData>(&serializer, None)?;
    let expected = concat!(
        r#"<SaveData xmlns="urn:game:save" xsi:nil="true" "#,
        r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"/>"#
    );
    assert_eq!(String::from_utf8_lossy(&bytes), expected);
    assert_eq!(from_bytes::<_, SaveData>(&serializer, &bytes)?, None);
    Ok(())
}

#[test]
fn line_breaks_in_content() -> Result<(), Error> {
    let value = SaveData { player: "Ann\nthe Brave".into(), ..save_data() };
    for handling in [NewLineHandling::Replace, NewLineHandling::Entitize, NewLineHandling::Preserve] {
        let options = WriterOptions { new_line_handling: handling, ..without_declaration() };
        let serializer = XmlStreamSerializer::new().with_writer_options(options);
        let bytes = to_bytes(&serializer, Some(&value))?;
        let markup = String::from_utf8_lossy(&bytes).into_owned();
        match handling {
            NewLineHandling::Entitize => assert!(markup.contains("<player>Ann&#xA;the Brave</player>"), "{markup}"),
            _ => assert!(markup.contains("<player>Ann\nthe Brave</player>"), "{markup}"),
        }
        assert_eq!(from_bytes::<_, SaveData>(&serializer, &bytes)?, Some(value.clone()), "{handling:?}");
    }
    Ok(())
}

#[test]
fn line_breaks_in_attributes_survive() -> Result<(), Error> {
    let mut value = save_data();
    value.inventory.item[0].name = "long\nsword".into();
    let serializer = XmlStreamSerializer::new();
    let bytes = to_bytes(&serializer, Some(&value))?;
    assert!(String::from_utf8_lossy(&bytes).contains(r#"name="long&#xA;sword""#));
    assert_eq!(from_bytes::<_, SaveData>(&serializer, &bytes)?, Some(value));
    Ok(())
}

#[test]
fn writing_flushes_without_closing() -> Result<(), Error> {
    let serializer = XmlStreamSerializer::new();
    let mut stream = std::io::BufWriter::new(Vec::new());
    serializer.serialize(&mut stream, Some(&Settings { volume: 1, fullscreen: true }))?;
    assert!(stream.buffer().is_empty());
    serializer.serialize(&mut stream, Some(&Settings { volume: 2, fullscreen: true }))?;
    assert_eq!(stream.get_ref().windows(10).filter(|window| *window == b"<Settings>").count(), 2);
    Ok(())
}
