//! Minimal `multipart/form-data` encoder for a single file field.

use uuid::Uuid;

use super::ScanUpload;

/// Form field the backend reads the scan from.
pub(crate) const FILE_FIELD: &str = "file";

/// Encoded request body together with its `Content-Type` header value.
#[derive(Debug)]
pub(crate) struct MultipartBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Encode `upload` as the only part of a form.
pub(crate) fn single_file(upload: &ScanUpload) -> MultipartBody {
    let boundary = format!("cancerna-{}", Uuid::new_v4().simple());
    single_file_with_boundary(upload, &boundary)
}

fn single_file_with_boundary(upload: &ScanUpload, boundary: &str) -> MultipartBody {
    let header = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"{FILE_FIELD}\"; filename=\"{}\"\r\n\
         Content-Type: {}\r\n\r\n",
        quote_filename(&upload.file_name),
        upload.content_type,
    );
    let trailer = format!("\r\n--{boundary}--\r\n");
    let mut bytes = Vec::with_capacity(header.len() + upload.bytes.len() + trailer.len());
    bytes.extend_from_slice(header.as_bytes());
    bytes.extend_from_slice(&upload.bytes);
    bytes.extend_from_slice(trailer.as_bytes());
    MultipartBody {
        content_type: format!("multipart/form-data; boundary={boundary}"),
        bytes,
    }
}

// Same escaping browsers apply to filenames in form submissions.
fn quote_filename(name: &str) -> String {
    name.replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, bytes: &[u8]) -> ScanUpload {
        ScanUpload {
            file_name: name.to_string(),
            content_type: "application/octet-stream".to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn encodes_single_file_part() {
        let body = single_file_with_boundary(&upload("scan.nii.gz", b"\x1f\x8b\x00"), "xyz");
        assert_eq!(body.content_type, "multipart/form-data; boundary=xyz");
        let mut expected = b"--xyz\r\nContent-Disposition: form-data; name=\"file\"; \
filename=\"scan.nii.gz\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            .to_vec();
        expected.extend_from_slice(b"\x1f\x8b\x00");
        expected.extend_from_slice(b"\r\n--xyz--\r\n");
        assert_eq!(body.bytes, expected);
    }

    #[test]
    fn escapes_quotes_and_newlines_in_filename() {
        assert_eq!(quote_filename("a\"b\r\nc.dcm"), "a%22b%0D%0Ac.dcm");
    }

    #[test]
    fn random_boundaries_differ_between_requests() {
        let first = single_file(&upload("a.png", b""));
        let second = single_file(&upload("a.png", b""));
        assert_ne!(first.content_type, second.content_type);
    }
}
