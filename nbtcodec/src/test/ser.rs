use super::builder::{sample_document, Builder};
use crate::de::{from_bytes, DecodeOpts};
use crate::error::ErrorKind;
use crate::ser::{to_bytes, to_writer};
use crate::{compound, Compound, List, RootCompound, Tag, TagType};

fn root(body: Compound) -> RootCompound {
    RootCompound::new("", body)
}

#[test]
fn empty_root() {
    let bs = to_bytes(&root(Compound::new())).unwrap();
    let expected = Builder::new().start_compound("").end_compound().build();

    assert_eq!(expected, bs);
}

#[test]
fn root_name_written() {
    let bs = to_bytes(&RootCompound::new("hello", Compound::new())).unwrap();
    let expected = Builder::new().start_compound("hello").end_compound().build();

    assert_eq!(expected, bs);
}

#[test]
fn simple_numbers() {
    let v = root(compound! {
        "i8" => i8::MAX,
        "i16" => i16::MAX,
        "i32" => i32::MAX,
        "i64" => i64::MAX,
        "f32" => f32::MAX,
        "f64" => f64::MAX,
    });

    let bs = to_bytes(&v).unwrap();
    let expected = Builder::new()
        .start_compound("")
        .byte("i8", i8::MAX)
        .short("i16", i16::MAX)
        .int("i32", i32::MAX)
        .long("i64", i64::MAX)
        .float("f32", f32::MAX)
        .double("f64", f64::MAX)
        .end_compound()
        .build();

    assert_eq!(expected, bs);
}

#[test]
fn strings_are_modified_utf8() {
    let v = root(compound! { "devil" => "😈", "nul" => "a\0b" });

    let bs = to_bytes(&v).unwrap();
    let expected = Builder::new()
        .start_compound("")
        .string("devil", "😈")
        .string("nul", "a\0b")
        .end_compound()
        .build();

    assert_eq!(expected, bs);
}

#[test]
fn arrays() {
    let v = root(compound! {
        "bytes" => vec![1_i8, -2, 3],
        "ints" => vec![1_i32, 2, 3],
        "longs" => vec![1_i64, i64::MIN],
    });

    let bs = to_bytes(&v).unwrap();
    let expected = Builder::new()
        .start_compound("")
        .byte_array("bytes", &[1, -2, 3])
        .int_array("ints", &[1, 2, 3])
        .long_array("longs", &[1, i64::MIN])
        .end_compound()
        .build();

    assert_eq!(expected, bs);
}

#[test]
fn list_elements_have_no_header() {
    let list = List::new(TagType::Short, vec![Tag::Short(1), Tag::Short(2)]).unwrap();
    let v = root(compound! { "list" => list });

    let bs = to_bytes(&v).unwrap();
    let expected = Builder::new()
        .start_compound("")
        .start_list("list", TagType::Short, 2)
        .short_payload(1)
        .short_payload(2)
        .end_compound()
        .build();

    assert_eq!(expected, bs);
}

#[test]
fn empty_list_writes_its_element_type() {
    let v = root(compound! {
        "end" => List::empty(TagType::End),
        "ints" => List::empty(TagType::Int),
    });

    let bs = to_bytes(&v).unwrap();
    let expected = Builder::new()
        .start_compound("")
        .start_list("end", TagType::End, 0)
        .start_list("ints", TagType::Int, 0)
        .end_compound()
        .build();

    assert_eq!(expected, bs);
}

#[test]
fn nested_compound_and_list_of_compounds() {
    let items = List::new(
        TagType::Compound,
        vec![
            Tag::Compound(compound! { "a" => 1_i8 }),
            Tag::Compound(Compound::new()),
        ],
    )
    .unwrap();

    let v = root(compound! {
        "inner" => compound! { "list" => items },
        "after" => 7_i8,
    });

    let bs = to_bytes(&v).unwrap();
    let expected = Builder::new()
        .start_compound("")
        .start_compound("inner")
        .start_list("list", TagType::Compound, 2)
        .start_anon_compound()
        .byte("a", 1)
        .end_anon_compound()
        .start_anon_compound()
        .end_anon_compound()
        .end_compound()
        .byte("after", 7)
        .end_compound()
        .build();

    assert_eq!(expected, bs);
}

#[test]
fn insertion_order_is_written_order() {
    let mut body = Compound::new();
    body.insert("z".to_owned(), Tag::Byte(1));
    body.insert("a".to_owned(), Tag::Byte(2));

    let bs = to_bytes(&root(body)).unwrap();
    let expected = Builder::new()
        .start_compound("")
        .byte("z", 1)
        .byte("a", 2)
        .end_compound()
        .build();

    assert_eq!(expected, bs);
}

#[test]
fn sample_document_is_reproduced_exactly() {
    let input = sample_document();
    let decoded = from_bytes(&input, DecodeOpts::new()).unwrap();

    assert_eq!(to_bytes(&decoded).unwrap(), input);
}

#[test]
fn java_strings_are_reproduced_exactly() {
    let input = Builder::new()
        .start_compound("")
        .string("nul", "a\0b")
        .string("emoji", "😀")
        .string("both", "\0😈\0")
        .end_compound()
        .build();

    let decoded = from_bytes(&input, DecodeOpts::new()).unwrap();
    assert_eq!(decoded.body["emoji"].as_str(), Some("😀"));
    assert_eq!(to_bytes(&decoded).unwrap(), input);
}

#[test]
fn deep_tree_encodes_without_overflow() {
    let input = super::builder::nested_compounds(100_000);
    let decoded = from_bytes(&input, DecodeOpts::new()).unwrap();

    assert_eq!(to_bytes(&decoded).unwrap(), input);
}

#[test]
fn too_long_string_is_error() {
    let long = "a".repeat(u16::MAX as usize + 1);
    let v = root(compound! { "long" => long.as_str() });

    let err = to_bytes(&v).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedFormat);
}

#[test]
fn longest_string_is_fine() {
    let long = "a".repeat(u16::MAX as usize);
    let v = root(compound! { "long" => long.as_str() });

    let bs = to_bytes(&v).unwrap();
    let decoded = from_bytes(&bs, DecodeOpts::new()).unwrap();
    assert_eq!(decoded, v);
}

struct FailingWriter;

impl std::io::Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn writer_failure_is_io_error() {
    let err = to_writer(FailingWriter, &root(compound! { "a" => 1 })).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(std::error::Error::source(&err).is_some());
}
