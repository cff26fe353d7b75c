//! Common test utilities for apksetup integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// A base directory for one apksetup run
pub struct TestWorkspace {
    pub temp: TempDir,
    pub path: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in the workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// apksetup command rooted at this workspace with developer overrides cleared
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("apksetup").expect("Failed to find apksetup binary");
        for var in [
            "APKSETUP_DIR",
            "APKSETUP_PLATFORM_TOOLS_URL",
            "APKSETUP_GITHUB_API",
            "GITHUB_TOKEN",
            "RUST_LOG",
        ] {
            cmd.env_remove(var);
        }
        cmd.env("NO_PROXY", "127.0.0.1,localhost");
        cmd.env("no_proxy", "127.0.0.1,localhost");
        cmd.arg("--dir").arg(&self.path);
        cmd
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Local HTTP server answering a fixed set of paths
///
/// Unknown paths get a 404. The server stops after `max_requests` connections.
pub struct TestServer {
    pub base_url: String,
}

impl TestServer {
    pub fn start(routes: Vec<(String, Vec<u8>)>, max_requests: usize) -> Self {
        Self::start_with(|_| routes, max_requests)
    }

    /// Start a server whose routes are built from its own base URL
    pub fn start_with(
        routes: impl FnOnce(&str) -> Vec<(String, Vec<u8>)>,
        max_requests: usize,
    ) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind local listener");
        let base_url = format!(
            "http://{}",
            listener.local_addr().expect("Failed to read local address")
        );
        let routes: HashMap<String, Vec<u8>> = routes(&base_url).into_iter().collect();

        std::thread::spawn(move || {
            for _ in 0..max_requests {
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

                let request = String::from_utf8_lossy(&request);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body) = match routes.get(&path) {
                    Some(body) => ("200 OK", body.clone()),
                    None => ("404 Not Found", b"{\"message\":\"Not Found\"}".to_vec()),
                };

                let head = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(&body);
                let _ = stream.flush();
            }
        });

        Self { base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Zip archive bytes laid out like the platform-tools download
pub fn platform_tools_zip() -> Vec<u8> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options =
            || SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        writer
            .add_directory("platform-tools/", options())
            .expect("Failed to add directory");
        for (name, contents) in [
            ("platform-tools/adb", b"#!/bin/sh\necho adb\n".as_slice()),
            ("platform-tools/adb.exe", b"MZ".as_slice()),
            ("platform-tools/fastboot", b"fastboot".as_slice()),
        ] {
            writer
                .start_file(name, options().unix_permissions(0o755))
                .expect("Failed to start entry");
            writer.write_all(contents).expect("Failed to write entry");
        }
        writer.finish().expect("Failed to finish archive");
    }
    cursor.into_inner()
}

/// Release metadata JSON with the given asset names and download URLs
pub fn release_json(assets: &[(&str, &str)]) -> Vec<u8> {
    let assets: Vec<String> = assets
        .iter()
        .map(|(name, url)| format!(r#"{{"name":"{name}","browser_download_url":"{url}"}}"#))
        .collect();
    format!(r#"{{"tag_name":"v1.0.0","assets":[{}]}}"#, assets.join(",")).into_bytes()
}

/// Whether `path` has an execute bit (always true for files off Unix)
pub fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path)
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        path.is_file()
    }
}
