// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use log::{info, warn};
use std::io::Cursor;
use tiny_http::{Header, Response, Server};
use tracksheet_sheets::SheetFetcher;

use crate::{ApiResponse, PROGRAMS_PATH, ProgramsApi};

/// Answers requests one at a time until the server is unblocked.
pub fn serve<F: SheetFetcher>(server: &Server, api: &ProgramsApi<F>) -> Result<()> {
    let content_type = Header::from_bytes("Content-Type", "application/json")
        .map_err(|()| anyhow!("invalid content type header"))?;
    info!("serving {PROGRAMS_PATH} on http://{}", server.server_addr());

    for request in server.incoming_requests() {
        let method = request.method().clone();
        let target = request.url().to_owned();
        let response = api.handle(&method, &target);
        info!("{method} {target} -> {}", response.status);

        if let Err(error) = request.respond(http_response(response, content_type.clone())) {
            warn!("write response for {method} {target}: {error}");
        }
    }
    Ok(())
}

fn http_response(response: ApiResponse, content_type: Header) -> Response<Cursor<Vec<u8>>> {
    Response::from_data(response.body.to_string().into_bytes())
        .with_status_code(response.status)
        .with_header(content_type)
}
