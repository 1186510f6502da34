//! Atomic save behaviour

use std::fs;
use std::path::Path;

use xlbook::prelude::*;
use xlbook::{EncodeError, XlsError, XlsxError};

const CFB_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_save_without_sheets_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    for (kind, name) in [(BookKind::Legacy, "empty.xls"), (BookKind::Modern, "empty.xlsx")] {
        let path = dir.path().join(name);
        let result = Book::new(kind).save(&path);

        let no_sheets = |e: &xlbook_core::Error| matches!(e, xlbook_core::Error::NoSheets);
        match result {
            Err(Error::Encode(EncodeError::Legacy(XlsError::Core(e)))) => assert!(no_sheets(&e)),
            Err(Error::Encode(EncodeError::Modern(XlsxError::Core(e)))) => assert!(no_sheets(&e)),
            other => panic!("unexpected result for {kind}: {other:?}"),
        }
        assert!(!path.exists());
    }
    assert!(dir_entries(dir.path()).is_empty());
}

#[test]
fn test_failed_save_keeps_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xlsx");
    fs::write(&path, b"previous contents").unwrap();

    let mut book = Book::new(BookKind::Modern);
    book.add_sheet("Bad")
        .unwrap()
        .write_number(0, 0, f64::NAN, None)
        .unwrap();
    assert!(matches!(book.save(&path), Err(Error::Encode(_))));

    assert_eq!(fs::read(&path).unwrap(), b"previous contents");
    assert_eq!(dir_entries(dir.path()), vec!["report.xlsx".to_string()]);
}

#[test]
fn test_save_replaces_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xls");
    fs::write(&path, b"stale").unwrap();

    let mut book = Book::new(BookKind::Legacy);
    book.add_sheet("Fresh")
        .unwrap()
        .write_string(0, 0, "new", None)
        .unwrap();
    book.save(&path).unwrap();

    let written = fs::read(&path).unwrap();
    assert_eq!(&written[..8], &CFB_SIGNATURE);
    assert_eq!(written.len(), book.to_bytes().unwrap().len());
    assert_eq!(dir_entries(dir.path()), vec!["report.xls".to_string()]);
}

#[test]
fn test_save_into_missing_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.xlsx");

    let book = xlbook::demo::demo_book(BookKind::Modern).unwrap();
    assert!(matches!(xlbook::save(&book, &path), Err(Error::Io(_))));
    assert!(!path.exists());
}

#[test]
fn test_saved_file_signature() {
    let dir = tempfile::tempdir().unwrap();
    for kind in [BookKind::Legacy, BookKind::Modern] {
        let book = xlbook::demo::demo_book(kind).unwrap();
        let path = dir.path().join(format!("demo.{}", kind.extension()));
        xlbook::save(&book, &path).unwrap();

        let written = fs::read(&path).unwrap();
        match kind {
            BookKind::Legacy => assert_eq!(&written[..8], &CFB_SIGNATURE),
            BookKind::Modern => assert!(written.starts_with(b"PK\x03\x04")),
        }
    }
}

#[test]
fn test_books_build_in_parallel() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Book>();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let kind = if i % 2 == 0 { BookKind::Legacy } else { BookKind::Modern };
                let mut book = Book::new(kind);
                book.add_sheet(&format!("Thread {i}"))
                    .unwrap()
                    .write_number(0, 0, f64::from(i), None)
                    .unwrap();
                xlbook::encode(&book).unwrap().len()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap() > 0);
    }
}
