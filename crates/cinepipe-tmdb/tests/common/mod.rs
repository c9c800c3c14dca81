//! Minimal fake TMDB server on 127.0.0.1 for end-to-end tests

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};

use serde_json::json;

/// Canned reply: status + body
pub type Reply = (u16, String);

/// Serves one request per connection (`Connection: close`), recording
/// every request target (path + query) it sees.
pub struct FakeServer {
    addr: SocketAddr,
    hits: Arc<Mutex<Vec<String>>>,
}

impl FakeServer {
    pub fn start(handler: impl Fn(&str) -> Reply + Send + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake server");
        let addr = listener.local_addr().expect("local addr");
        let hits = Arc::new(Mutex::new(Vec::new()));
        let seen = hits.clone();

        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                serve(stream, &handler, &seen);
            }
        });

        Self { addr, hits }
    }

    /// API root as the client expects it (`http://127.0.0.1:PORT/3`)
    pub fn api_url(&self) -> String {
        format!("http://{}/3", self.addr)
    }

    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    /// Page numbers of the popular-listing requests, in order
    pub fn popular_pages(&self) -> Vec<u32> {
        self.hits()
            .iter()
            .filter(|h| h.starts_with("/3/movie/popular?"))
            .filter_map(|h| query_param(h, "page"))
            .filter_map(|p| p.parse().ok())
            .collect()
    }
}

fn serve(stream: TcpStream, handler: &impl Fn(&str) -> Reply, hits: &Mutex<Vec<String>>) {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    // Drain headers
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) if line == "\r\n" || line == "\n" => break,
            Ok(_) => {}
        }
    }

    let target = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();
    hits.lock().unwrap().push(target.clone());

    let (status, body) = handler(&target);
    let response = format!(
        "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        reason(status),
        body.len()
    );
    let mut stream = reader.into_inner();
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

pub fn query_param<'a>(target: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = target.split_once('?')?;
    query
        .split('&')
        .filter_map(|kv| kv.split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

/// Scripted TMDB catalog: which pages exist, which fail, which movies lack credits
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub pages: BTreeMap<u32, Vec<u64>>,
    pub failing_pages: BTreeSet<u32>,
    pub missing_credits: BTreeSet<u64>,
}

impl Catalog {
    pub fn with_pages(pages: &[(u32, &[u64])]) -> Self {
        Self {
            pages: pages.iter().map(|(p, ids)| (*p, ids.to_vec())).collect(),
            ..Default::default()
        }
    }

    pub fn respond(&self, target: &str) -> Reply {
        if query_param(target, "api_key").is_none() {
            return (401, json!({"status_message": "Invalid API key"}).to_string());
        }
        let path = target.split_once('?').map_or(target, |(p, _)| p);
        let Some(rest) = path.strip_prefix("/3/movie/") else {
            return not_found();
        };

        if rest == "popular" {
            let page: u32 = query_param(target, "page")
                .and_then(|p| p.parse().ok())
                .unwrap_or(1);
            if self.failing_pages.contains(&page) {
                return (500, json!({"status_message": "boom"}).to_string());
            }
            let ids = self.pages.get(&page).cloned().unwrap_or_default();
            let results: Vec<_> = ids
                .iter()
                .map(|id| json!({"id": id, "title": format!("Movie {id}")}))
                .collect();
            return (200, json!({"page": page, "results": results}).to_string());
        }

        if let Some(id) = rest.strip_suffix("/credits") {
            let Ok(id) = id.parse::<u64>() else {
                return not_found();
            };
            if self.missing_credits.contains(&id) {
                return not_found();
            }
            return (200, credits_json(id));
        }

        match rest.parse::<u64>() {
            Ok(id) => (200, detail_json(id)),
            Err(_) => not_found(),
        }
    }
}

fn not_found() -> Reply {
    (404, json!({"status_message": "not found"}).to_string())
}

pub fn detail_json(id: u64) -> String {
    json!({
        "id": id,
        "title": format!("Movie {id}"),
        "original_title": format!("Original {id}"),
        "release_date": "2024-05-01",
        "budget": 1_000_000,
        "revenue": 5_000_000,
        "runtime": 101,
        "genres": [{"id": 18, "name": "Drama"}, {"id": 10752, "name": "War"}],
        "popularity": 42.5,
        "vote_average": 7.25,
        "vote_count": 1200
    })
    .to_string()
}

pub fn credits_json(id: u64) -> String {
    json!({
        "id": id,
        "cast": [
            {"name": format!("Lead {id}")},
            {"name": format!("Support {id}")},
            {"name": "Extra"},
            {"name": "Cameo"}
        ],
        "crew": [
            {"name": "Writer", "job": "Screenplay"},
            {"name": format!("Director {id}"), "job": "Director"}
        ]
    })
    .to_string()
}
