use std::path::PathBuf;

use tempfile::TempDir;

use super::*;
use crate::bencode::{decode, encode, DecodeError, DecodeOptions, Span};

// Info keys are deliberately unsorted ("name" before "length"), as some
// producers emit them.
const SINGLE_INFO_HASH: &str = "adafd90795e21c51c41905ec10cbb572c1fb7837";
const SINGLE_INFO_HASH_REENCODED: &str = "a75d35daa43d91e1c975e76df3d683f54290bd53";
const MULTI_INFO_HASH: &str = "ce8071549d303ab096be528ede6515999c8bc8b6";

fn single_file_info() -> Vec<u8> {
    let mut info = b"d4:name8:demo.bin12:piece lengthi16384e6:lengthi40000e6:pieces60:".to_vec();
    info.extend_from_slice(&[b'a'; 20]);
    info.extend_from_slice(&[b'b'; 20]);
    info.extend_from_slice(&[b'c'; 20]);
    info.push(b'e');
    info
}

fn single_file_torrent() -> Vec<u8> {
    let mut data = b"d8:announce31:http://tracker.example/announce4:info".to_vec();
    data.extend_from_slice(&single_file_info());
    data.extend_from_slice(b"10:created by4:demoe");
    data
}

fn multi_file_torrent() -> Vec<u8> {
    let mut data = b"d8:announce18:udp://t.example:8013:announce-listll18:udp://t.example:80el17:http://b.example/ee4:info".to_vec();
    data.extend_from_slice(
        b"d5:filesld6:lengthi100e4:pathl1:a5:x.bineed6:lengthi50e4:pathl1:b5:y.bineee\
          4:name4:pack12:piece lengthi16384e6:pieces20:",
    );
    data.extend_from_slice(&[b'z'; 20]);
    data.extend_from_slice(b"7:privatei1eee");
    data
}

#[test]
fn test_sha1_hex() {
    assert_eq!(sha1_hex(b""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    assert_eq!(sha1_hex(b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
}

#[test]
fn test_extract_info_span() {
    let data = single_file_torrent();
    let span = extract_info_span(&data).unwrap();
    assert_eq!(span, Span::new(51, 177));
    assert_eq!(&data[span.range()], single_file_info().as_slice());
    assert_eq!(info_bytes(&data).unwrap(), single_file_info().as_slice());
}

#[test]
fn test_compute_info_hash_uses_original_bytes() {
    let data = single_file_torrent();
    assert_eq!(compute_info_hash(&data).unwrap(), SINGLE_INFO_HASH);

    // Re-encoding sorts the keys and changes the hash.
    let info = info_bytes(&data).unwrap();
    let reencoded = encode(&decode(info).unwrap());
    assert_ne!(reencoded, info);
    assert_eq!(sha1_hex(&reencoded), SINGLE_INFO_HASH_REENCODED);
}

#[test]
fn test_compute_info_hash_multi_file() {
    let data = multi_file_torrent();
    assert_eq!(compute_info_hash(&data).unwrap(), MULTI_INFO_HASH);
    assert_eq!(extract_info_span(&data).unwrap(), Span::new(101, data.len() - 1));
}

#[test]
fn test_missing_info_key() {
    let err = extract_info_span(b"d8:announce3:urle").unwrap_err();
    assert!(matches!(err, MetainfoError::MissingInfoKey { offset: 16 }));
    assert_eq!(err.offset(), Some(16));

    // Only the top level counts.
    assert!(matches!(
        extract_info_span(b"d5:outerd4:infod1:ai1eeee"),
        Err(MetainfoError::MissingInfoKey { offset: 24 })
    ));
    assert!(matches!(
        Metainfo::from_bytes(b"de"),
        Err(MetainfoError::MissingInfoKey { offset: 1 })
    ));
}

#[test]
fn test_info_not_a_dictionary() {
    let err = extract_info_span(b"d4:infoi1ee").unwrap_err();
    assert!(matches!(err, MetainfoError::NotADictionary { offset: 7 }));
    assert_eq!(err.offset(), Some(7));

    assert!(matches!(
        extract_info_span(b"li1ee"),
        Err(MetainfoError::RootNotADictionary)
    ));
}

#[test]
fn test_decode_errors_propagate() {
    assert!(matches!(
        extract_info_span(b"d4:info"),
        Err(MetainfoError::Decode(DecodeError::UnterminatedContainer { offset: 0 }))
    ));

    let mut data = single_file_torrent();
    data.push(b'x');
    let err = compute_info_hash(&data).unwrap_err();
    assert!(matches!(
        err,
        MetainfoError::Decode(DecodeError::TrailingData { .. })
    ));
    assert_eq!(err.offset(), Some(data.len() - 1));
}

#[test]
fn test_extract_accepts_leading_zeros() {
    let data = b"d4:infod6:lengthi007e4:name1:xee";
    let span = extract_info_span(data).unwrap();
    assert_eq!(span.slice(data), Some(b"d6:lengthi007e4:name1:xe".as_slice()));
    assert_eq!(
        compute_info_hash(data).unwrap(),
        "d8429b512c7f5f17bfb5c2d4132a839e585aed96"
    );
    assert_eq!(
        compute_info_hash(data).unwrap(),
        sha1_hex(b"d6:lengthi007e4:name1:xe")
    );

    // Strict decoding is still available.
    assert!(matches!(
        extract_info_span_with(data, &DecodeOptions::default()),
        Err(MetainfoError::Decode(DecodeError::InvalidInteger { offset: 17, .. }))
    ));
}

#[test]
fn test_extract_accepts_duplicate_keys() {
    let data = b"d4:infod1:ai1e1:ai2eee";
    assert_eq!(
        info_bytes(data).unwrap(),
        b"d1:ai1e1:ai2ee".as_slice()
    );
    assert_eq!(compute_info_hash(data).unwrap(), sha1_hex(b"d1:ai1e1:ai2ee"));

    // A repeated top-level info key resolves to the last one.
    let data = b"d4:infod1:ai1ee4:infod1:bi2eee";
    assert_eq!(info_bytes(data).unwrap(), b"d1:bi2ee".as_slice());

    assert!(matches!(
        extract_info_span_with(data, &DecodeOptions::default()),
        Err(MetainfoError::Decode(DecodeError::DuplicateKey { offset: 15 }))
    ));
}

#[test]
fn test_verify_info_hash() {
    let data = single_file_torrent();
    assert!(verify_info_hash(&data, SINGLE_INFO_HASH).unwrap());
    assert!(verify_info_hash(&data, &SINGLE_INFO_HASH.to_uppercase()).unwrap());
    assert!(!verify_info_hash(&data, SINGLE_INFO_HASH_REENCODED).unwrap());
    assert!(matches!(
        verify_info_hash(&data, "not-a-hash"),
        Err(MetainfoError::InvalidInfoHash(_))
    ));
}

#[test]
fn test_info_hash_from_hex() {
    let hash = InfoHash::from_hex(MULTI_INFO_HASH).unwrap();
    assert_eq!(hash.to_hex(), MULTI_INFO_HASH);
    assert_eq!(hash.to_string(), MULTI_INFO_HASH);
    assert_eq!(format!("{:?}", hash), format!("InfoHash({})", MULTI_INFO_HASH));
    assert_eq!(hash.as_bytes()[0], 0xce);

    let parsed: InfoHash = MULTI_INFO_HASH.parse().unwrap();
    assert_eq!(parsed, hash);

    assert!(InfoHash::from_hex("abcd").is_err());
    assert!(InfoHash::from_hex(&"g".repeat(40)).is_err());
}

#[test]
fn test_info_hash_from_bytes() {
    let hash = InfoHash::from_bytes(&[7u8; 20]).unwrap();
    assert_eq!(hash, InfoHash::new([7u8; 20]));
    assert!(InfoHash::from_bytes(&[7u8; 19]).is_err());

    let data = multi_file_torrent();
    assert_eq!(InfoHash::from_torrent(&data).unwrap().to_hex(), MULTI_INFO_HASH);
    assert_eq!(
        InfoHash::from_info_bytes(b"abc").to_hex(),
        "a9993e364706816aba3e25717850c26c9cd0d89d"
    );
}

#[test]
fn test_metainfo_single_file() {
    let data = single_file_torrent();
    let metainfo = Metainfo::from_bytes(&data).unwrap();

    assert_eq!(metainfo.info_hash.to_hex(), SINGLE_INFO_HASH);
    assert_eq!(metainfo.info_span, Span::new(51, 177));
    assert_eq!(&metainfo.raw_info()[..], single_file_info().as_slice());
    assert_eq!(
        metainfo.announce.as_deref(),
        Some("http://tracker.example/announce")
    );
    assert_eq!(metainfo.created_by.as_deref(), Some("demo"));
    assert_eq!(metainfo.comment, None);

    let info = &metainfo.info;
    assert_eq!(info.name, "demo.bin");
    assert_eq!(info.piece_length, 16384);
    assert_eq!(info.piece_count(), 3);
    assert_eq!(info.pieces[1], [b'b'; 20]);
    assert_eq!(info.total_length, 40000);
    assert!(!info.private);
    assert_eq!(
        info.files,
        vec![File {
            path: PathBuf::from("demo.bin"),
            length: 40000,
            offset: 0,
        }]
    );
}

#[test]
fn test_metainfo_multi_file() {
    let metainfo = Metainfo::from_bytes(&multi_file_torrent()).unwrap();

    assert_eq!(metainfo.info_hash.to_hex(), MULTI_INFO_HASH);
    assert_eq!(
        metainfo.trackers(),
        vec!["udp://t.example:80".to_string(), "http://b.example/".to_string()]
    );
    assert_eq!(metainfo.announce_list.len(), 2);

    let info = &metainfo.info;
    assert!(info.private);
    assert_eq!(info.total_length, 150);
    assert_eq!(info.files.len(), 2);
    assert_eq!(info.files[0].path, PathBuf::from("pack/a/x.bin"));
    assert_eq!(info.files[1].path, PathBuf::from("pack/b/y.bin"));
    assert_eq!(info.files[1].offset, 100);
}

#[test]
fn test_metainfo_invalid_fields() {
    let err = Metainfo::from_bytes(b"d4:infod4:name1:x12:piece lengthi1e6:lengthi1eee").unwrap_err();
    assert!(matches!(
        err,
        MetainfoError::MissingField {
            field: "pieces",
            offset: 7
        }
    ));
    assert_eq!(err.offset(), Some(7));

    let err = Metainfo::from_bytes(b"d4:infod4:name1:x12:piece lengthi1e6:pieces3:abc6:lengthi1eee")
        .unwrap_err();
    assert!(matches!(
        err,
        MetainfoError::InvalidField {
            field: "pieces",
            offset: 43
        }
    ));
    assert_eq!(err.to_string(), "invalid field pieces at byte 43");

    assert!(matches!(
        Metainfo::from_bytes(b"d4:infod4:name1:x12:piece lengthi1e6:pieces0:6:lengthi-1eee"),
        Err(MetainfoError::InvalidField {
            field: "length",
            offset: 53
        })
    ));
    assert!(matches!(
        Metainfo::from_bytes(b"d4:infod4:name1:x12:piece lengthi1e6:pieces0:ee"),
        Err(MetainfoError::MissingField {
            field: "length or files",
            offset: 7
        })
    ));
}

#[test]
fn test_metainfo_tolerates_leading_zeros() {
    let data = b"d4:infod4:name1:x12:piece lengthi01e6:pieces0:6:lengthi007eee";
    let metainfo = Metainfo::from_bytes(data).unwrap();
    assert_eq!(metainfo.info.total_length, 7);
    assert_eq!(metainfo.info.piece_length, 1);
    assert_eq!(metainfo.info_hash.to_hex(), compute_info_hash(data).unwrap());
}

fn multi_file_with_component(component: &[u8]) -> Vec<u8> {
    let mut data = b"d4:infod5:filesld6:lengthi1e4:pathl".to_vec();
    data.extend_from_slice(component.len().to_string().as_bytes());
    data.push(b':');
    data.extend_from_slice(component);
    data.extend_from_slice(b"eee4:name4:pack12:piece lengthi1e6:pieces0:ee");
    data
}

#[test]
fn test_metainfo_rejects_unsafe_paths() {
    for component in [
        b"\xff".as_slice(),
        b"..",
        b".",
        b"",
        b"/etc",
        b"a/b",
        b"a\\b",
        b"C:",
    ] {
        let data = multi_file_with_component(component);
        let err = Metainfo::from_bytes(&data).unwrap_err();
        assert!(
            matches!(
                err,
                MetainfoError::InvalidField {
                    field: "file path",
                    offset: 35
                }
            ),
            "{:?} gave {:?}",
            component,
            err
        );
        // The info-hash does not depend on the file list being usable.
        assert!(compute_info_hash(&data).is_ok());
    }

    let metainfo = Metainfo::from_bytes(&multi_file_with_component(b"ok.bin")).unwrap();
    assert_eq!(metainfo.info.files[0].path, PathBuf::from("pack/ok.bin"));

    assert!(matches!(
        Metainfo::from_bytes(b"d4:infod5:filesld6:lengthi1e4:pathleee4:name4:pack12:piece lengthi1e6:pieces0:ee"),
        Err(MetainfoError::InvalidField {
            field: "file path",
            offset: 34
        })
    ));
    assert!(matches!(
        Metainfo::from_bytes(b"d4:infod4:name2:..12:piece lengthi1e6:pieces0:6:lengthi1eee"),
        Err(MetainfoError::InvalidField { field: "name", .. })
    ));
}

#[test]
fn test_metainfo_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("demo.torrent");
    std::fs::write(&path, single_file_torrent()).unwrap();

    let metainfo = Metainfo::from_file(&path).unwrap();
    assert_eq!(metainfo.info_hash.to_hex(), SINGLE_INFO_HASH);

    assert!(matches!(
        Metainfo::from_file(dir.path().join("missing.torrent")),
        Err(MetainfoError::Io(_))
    ));
}
