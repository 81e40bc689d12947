// Shared helpers for the HTTP tests
#![allow(dead_code, unused_macros)]

use actix_web::http::header;
use actix_web::test::TestRequest;

pub const BOUNDARY: &str = "----proposalsTestBoundary7MA4YWxkTrZu0gW";

/// Build the app under test around an `AppState`
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .configure(proposals::configure_routes),
        )
        .await
    };
}

/// Hand-rolled multipart/form-data body
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four required fields, filled in
    pub fn required_fields() -> Self {
        Self::new()
            .text("name", "Yaakov Cohen")
            .text("yeshiva", "Lakewood")
            .text("shadchan", "Mrs. Rosenberg")
            .text("details", "Oldest of six, learning in BMG")
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, filename, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        self.body
    }

    /// Attach this body to a request builder
    pub fn into_request(self, request: TestRequest) -> TestRequest {
        request
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(self.finish())
    }
}

/// A few bytes that look like a PDF header, plus every byte value
pub fn pdf_bytes() -> Vec<u8> {
    let mut data = b"%PDF-1.7\n".to_vec();
    data.extend(0u8..=255);
    data
}

pub fn png_bytes() -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d]
}
