use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use super::builder::sample_document;
use crate::compression::GZIP_MAGIC;
use crate::de::{from_bytes, DecodeOpts};
use crate::error::ErrorKind;
use crate::{decode, decode_reader, encode, encode_to_writer, Compression};

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

fn gunzip(bytes: &[u8]) -> Vec<u8> {
    let mut out = vec![];
    GzDecoder::new(bytes).read_to_end(&mut out).unwrap();
    out
}

#[test]
fn sniff() {
    assert_eq!(Compression::sniff(&[0x1f, 0x8b, 0x08]), Compression::Gzip);
    assert_eq!(Compression::sniff(&GZIP_MAGIC), Compression::Gzip);
    assert_eq!(Compression::sniff(&[0x1f]), Compression::None);
    assert_eq!(Compression::sniff(&[0x8b, 0x1f]), Compression::None);
    assert_eq!(Compression::sniff(&[10, 0, 0, 0]), Compression::None);
    assert_eq!(Compression::sniff(&[]), Compression::None);
}

#[test]
fn plain_input_reports_uncompressed() {
    let raw = sample_document();
    let (root, compression) = decode(&raw, None).unwrap();

    assert_eq!(compression, Compression::None);
    assert!(!compression.is_compressed());
    assert_eq!(root, from_bytes(&raw, DecodeOpts::new()).unwrap());
}

#[test]
fn gzip_input_reports_compressed() {
    let raw = sample_document();
    let (root, compression) = decode(&gzip(&raw), None).unwrap();

    assert_eq!(compression, Compression::Gzip);
    assert!(compression.is_compressed());
    assert_eq!(root, from_bytes(&raw, DecodeOpts::new()).unwrap());
}

#[test]
fn reader_input_is_sniffed_too() {
    let raw = sample_document();

    let (plain, compression) = decode_reader(raw.as_slice(), DecodeOpts::new()).unwrap();
    assert_eq!(compression, Compression::None);

    let zipped = gzip(&raw);
    let (unzipped, compression) = decode_reader(zipped.as_slice(), DecodeOpts::new()).unwrap();
    assert_eq!(compression, Compression::Gzip);

    assert_eq!(plain, unzipped);
}

/// Hands out one byte per read, to exercise sniffing across short reads.
struct Trickle<'a>(&'a [u8]);

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match (self.0.split_first(), buf.first_mut()) {
            (Some((b, rest)), Some(slot)) => {
                *slot = *b;
                self.0 = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

#[test]
fn sniff_reader_handles_short_reads() {
    let raw = sample_document();
    let zipped = gzip(&raw);

    let (compression, mut reader) = Compression::sniff_reader(Trickle(&zipped)).unwrap();
    assert_eq!(compression, Compression::Gzip);

    let mut out = vec![];
    reader.read_to_end(&mut out).unwrap();
    assert_eq!(out, raw);
}

#[test]
fn sniff_reader_keeps_tiny_input() {
    let (compression, mut reader) = Compression::sniff_reader(&[0x1f][..]).unwrap();
    assert_eq!(compression, Compression::None);

    let mut out = vec![];
    reader.read_to_end(&mut out).unwrap();
    assert_eq!(out, [0x1f]);
}

#[test]
fn encode_respects_requested_compression() {
    let raw = sample_document();
    let (root, _) = decode(&raw, None).unwrap();

    assert_eq!(encode(&root, Compression::None).unwrap(), raw);

    let zipped = encode(&root, Compression::Gzip).unwrap();
    assert!(zipped.starts_with(&GZIP_MAGIC));
    assert_eq!(gunzip(&zipped), raw);

    let (again, compression) = decode(&zipped, None).unwrap();
    assert_eq!(compression, Compression::Gzip);
    assert_eq!(again, root);
}

#[test]
fn encode_to_writer_returns_writer() {
    let raw = sample_document();
    let (root, _) = decode(&raw, None).unwrap();

    let out = encode_to_writer(Vec::new(), &root, Compression::Gzip).unwrap();
    assert_eq!(gunzip(&out), raw);
}

#[test]
fn gzip_wrapped_garbage_fails() {
    let zipped = gzip(&[200, 1, 2, 3]);
    let err = decode(&zipped, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedFormat);

    // A gzip header with a corrupt body fails in the decompressor instead.
    let mut broken = gzip(&sample_document());
    let mid = broken.len() / 2;
    for b in &mut broken[12..mid] {
        *b = !*b;
    }
    assert!(decode(&broken, None).is_err());
}
