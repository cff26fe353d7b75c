//! Test fixtures shared by unit tests.
//!
//! Provides temp directories, in-memory zip archives and a one-shot local
//! HTTP responder so transfer and release tests never touch the network.
//!
//! ```ignore
//! use crate::test_fixtures::{create_temp_dir, http_response, serve_once};
//!
//! let temp = create_temp_dir();
//! let base_url = serve_once(http_response("200 OK", &[("Content-Length", "2")], b"ok"));
//! ```

#![allow(clippy::expect_used)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;

use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(crate::temp::temp_dir_base()).expect("Failed to create temp directory")
}

/// An entry of a fixture zip archive
pub enum ZipEntry<'a> {
    Dir(&'a str),
    File(&'a str, &'a [u8]),
}

/// Write a zip archive with the given entries to `path`.
///
/// # Panics
///
/// Panics if the archive cannot be written.
pub fn write_zip(path: &Path, entries: &[ZipEntry<'_>]) {
    let file = std::fs::File::create(path).expect("Failed to create zip file");
    let mut writer = zip::ZipWriter::new(file);
    let options =
        || SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for entry in entries {
        match entry {
            ZipEntry::Dir(name) => writer
                .add_directory(*name, options())
                .expect("Failed to add zip directory"),
            ZipEntry::File(name, contents) => {
                writer
                    .start_file(*name, options())
                    .expect("Failed to start zip entry");
                writer
                    .write_all(contents)
                    .expect("Failed to write zip entry");
            }
        }
    }

    writer.finish().expect("Failed to finish zip file");
}

/// Build the platform-tools layout the real archive uses: one nested directory.
pub fn write_platform_tools_zip(path: &Path) {
    write_zip(
        path,
        &[
            ZipEntry::Dir("platform-tools/"),
            ZipEntry::File("platform-tools/adb", b"#!/bin/sh\necho adb\n"),
            ZipEntry::File("platform-tools/fastboot", b"fastboot"),
            ZipEntry::Dir("platform-tools/lib64/"),
            ZipEntry::File("platform-tools/lib64/libc++.so", b"lib"),
        ],
    );
}

/// Render a raw HTTP/1.1 response.
pub fn http_response(status: &str, headers: &[(&str, &str)], body: &[u8]) -> Vec<u8> {
    let mut response = format!("HTTP/1.1 {status}\r\n");
    for (name, value) in headers {
        response.push_str(&format!("{name}: {value}\r\n"));
    }
    response.push_str("\r\n");

    let mut bytes = response.into_bytes();
    bytes.extend_from_slice(body);
    bytes
}

/// Serve `response` verbatim to the first connection and close it.
///
/// Returns the base URL (`http://127.0.0.1:<port>`).
///
/// # Panics
///
/// Panics if no local port can be bound.
pub fn serve_once(response: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind local listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    std::thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };

        let mut request = Vec::new();
        let mut buffer = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buffer) {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buffer[..n]),
            }
        }

        let _ = stream.write_all(&response);
        let _ = stream.flush();
    });

    format!("http://{addr}")
}

/// HTTP client that ignores proxy environment variables.
///
/// # Panics
///
/// Panics if the client cannot be built.
pub fn local_client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .expect("Failed to build HTTP client")
}
