use std::fs;
use std::time::Duration;
use syno_file_station::client::SynoError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use wiremock::{Match, Request, ResponseTemplate};

/// # Panics
///
/// Will panic if a file can't be read or missing
#[must_use = "This function returns the body of the file as a string"]
pub fn body_from_file(path: &str) -> String {
    fs::read_to_string(path).expect("Failed to read file")
}

/// 200 response carrying a JSON fixture from `test-files/`
pub fn json_response(response_file: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body_from_file(response_file), "application/json")
}

/// Digs the [`SynoError`] out of an `anyhow` error chain
pub fn syno_error(error: &anyhow::Error) -> &SynoError {
    error
        .downcast_ref::<SynoError>()
        .expect("Error chain does not contain a SynoError")
}

pub struct FormParamExactMatcher(String, String);

impl FormParamExactMatcher {
    /// Specify the expected value for a form parameter.
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self(key.into(), value.into())
    }
}

/// Shorthand for [`FormParamExactMatcher::new`].
pub fn form_param<K, V>(key: K, value: V) -> FormParamExactMatcher
where
    K: Into<String>,
    V: Into<String>,
{
    FormParamExactMatcher::new(key, value)
}

impl Match for FormParamExactMatcher {
    fn matches(&self, request: &Request) -> bool {
        form_urlencoded::parse(&request.body)
            .any(|q| q.0 == self.0.as_str() && q.1 == self.1.as_str())
    }
}

/// Matches requests whose form body has no parameter named `key`
pub struct FormParamAbsentMatcher(String);

pub fn form_param_absent<K: Into<String>>(key: K) -> FormParamAbsentMatcher {
    FormParamAbsentMatcher(key.into())
}

impl Match for FormParamAbsentMatcher {
    fn matches(&self, request: &Request) -> bool {
        !form_urlencoded::parse(&request.body).any(|q| q.0 == self.0.as_str())
    }
}

/// Starts a bare HTTP server that answers POSTs with a successful login and
/// GETs with a body written chunk by chunk, `delay` apart, announcing
/// `content_length` bytes whether or not the chunks add up to it.
/// Every connection is closed after one response.
pub async fn spawn_streaming_server(
    content_length: usize,
    chunks: Vec<Vec<u8>>,
    delay: Duration,
) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let head = read_request(&mut socket).await;
            if head.starts_with("POST") {
                let body = body_from_file("test-files/login_success.json");
                let reply = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(reply.as_bytes()).await.ok();
            } else {
                let reply = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/octet-stream\r\ncontent-length: {content_length}\r\nconnection: close\r\n\r\n"
                );
                socket.write_all(reply.as_bytes()).await.ok();
                for chunk in &chunks {
                    tokio::time::sleep(delay).await;
                    socket.write_all(chunk).await.ok();
                    socket.flush().await.ok();
                }
            }
            socket.shutdown().await.ok();
        }
    });

    format!("http://{address}")
}

/// Reads one request (head and body) and returns the head
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let read = socket.read(&mut chunk).await.unwrap_or(0);
        if read == 0 {
            return String::from_utf8_lossy(&buffer).into_owned();
        }
        buffer.extend_from_slice(&chunk[..read]);

        let Some(end) = buffer.windows(4).position(|window| window == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buffer[..end]).into_owned();
        let body_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while buffer.len() < end + 4 + body_length {
            let read = socket.read(&mut chunk).await.unwrap_or(0);
            if read == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..read]);
        }
        return head;
    }
}
