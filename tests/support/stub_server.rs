use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// One request as received by the stub.
#[derive(Debug, Default)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Canned HTTP response.
pub struct StubResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl StubResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn png(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "image/png",
            body,
        }
    }
}

/// Local HTTP server answering one connection per scripted response.
pub struct StubServer {
    base_url: String,
    handle: JoinHandle<Vec<CapturedRequest>>,
}

impl StubServer {
    pub fn start(responses: Vec<StubResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let addr = listener.local_addr().expect("stub addr");
        let handle = thread::spawn(move || {
            let mut captured = Vec::new();
            for response in responses {
                let (stream, _) = listener.accept().expect("accept");
                let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
                let request = read_request(&mut reader);
                write_response(stream, &response);
                captured.push(request);
            }
            captured
        });
        Self {
            base_url: format!("http://{addr}/"),
            handle,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Wait for every scripted exchange and return the captured requests.
    pub fn finish(self) -> Vec<CapturedRequest> {
        self.handle.join().expect("stub server thread")
    }
}

fn read_request(reader: &mut impl BufRead) -> CapturedRequest {
    let mut request = CapturedRequest::default();
    let mut line = String::new();
    reader.read_line(&mut line).expect("request line");
    request.request_line = line.trim_end().to_string();
    loop {
        line.clear();
        reader.read_line(&mut line).expect("header line");
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            break;
        }
        if let Some((key, value)) = trimmed.split_once(':') {
            request
                .headers
                .push((key.trim().to_string(), value.trim().to_string()));
        }
    }
    let length = request
        .header("Content-Length")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0);
    request.body = vec![0; length];
    reader.read_exact(&mut request.body).expect("request body");
    request
}

fn write_response(mut stream: impl Write, response: &StubResponse) {
    let reason = match response.status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let head = format!(
        "HTTP/1.1 {} {reason}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        response.content_type,
        response.body.len()
    );
    stream.write_all(head.as_bytes()).expect("write head");
    stream.write_all(&response.body).expect("write body");
    stream.flush().expect("flush");
}
