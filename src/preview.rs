use std::{fs, path::PathBuf};

use tiny_http::{Header, Response, Server};

/// Serve the rendered output at `/`, anything else is a 404
pub fn start_preview_server(output: PathBuf, port: u16) {
    let addr = format!("0.0.0.0:{}", port);

    let server = match Server::http(&addr) {
        Ok(server) => server,
        Err(e) => {
            log::error!("Failed to start preview server on {addr}: {e}");
            return;
        }
    };

    let file_name = output
        .file_name()
        .map(|name| name.to_string_lossy().to_string());

    for request in server.incoming_requests() {
        let url_path = request.url().to_string();
        let path = url_path.trim_start_matches('/');
        log::debug!("Request: {} -> {:?}", url_path, output);

        if !path.is_empty() && Some(path) != file_name.as_deref() {
            let _ = request.respond(Response::from_string("404 Not Found").with_status_code(404));
            log::warn!("404 {}", url_path);
            continue;
        }

        match fs::read(&output) {
            Ok(contents) => {
                let content_type = match output.extension().and_then(|s| s.to_str()) {
                    Some("html") | Some("htm") => "text/html; charset=utf-8",
                    _ => "text/plain; charset=utf-8",
                };
                let response = match Header::from_bytes(&b"Content-Type"[..], content_type) {
                    Ok(header) => Response::from_data(contents).with_header(header),
                    Err(_) => Response::from_data(contents),
                };
                if request.respond(response).is_ok() {
                    log::info!("200 {}", url_path);
                }
            }
            Err(e) => {
                let response = Response::from_string("Internal Server Error").with_status_code(500);
                let _ = request.respond(response);
                log::error!("500 {} - Failed to read {:?}: {e}", url_path, output);
            }
        }
    }
}
