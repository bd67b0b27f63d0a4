//! In-process stand-in for the catalog API and a file host.
#![allow(dead_code)]

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use craftcatalog::Config;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use matchit::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const API_KEY: &str = "test-key";

/// Size of every file served under `/files`.
pub const FILE_SIZE: usize = 2048;

#[derive(Clone, Copy)]
enum Route {
    Search,
    Mod,
    Files,
    File,
    Attachment,
    Redirect,
}

fn build_router() -> Router<Route> {
    let mut router = Router::new();
    router.insert("/v1/mods/search", Route::Search).unwrap();
    router.insert("/v1/mods/{id}", Route::Mod).unwrap();
    router.insert("/v1/mods/{id}/files", Route::Files).unwrap();
    router.insert("/files/{name}", Route::File).unwrap();
    router.insert("/attachment/{name}", Route::Attachment).unwrap();
    router.insert("/redirect/{name}", Route::Redirect).unwrap();
    router
}

/// A canned response.
#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u16,
    pub body: String,
}

impl Canned {
    pub fn json(body: Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: json!({ "error": "canned failure" }).to_string(),
        }
    }
}

/// One request seen by the upstream.
#[derive(Debug, Clone)]
pub struct Hit {
    pub method: Method,
    pub path: String,
    pub query: String,
    pub api_key: Option<String>,
}

#[derive(Default)]
struct State {
    search: Mutex<Option<Canned>>,
    mods: Mutex<HashMap<String, Canned>>,
    files: Mutex<HashMap<String, Canned>>,
    hits: Mutex<Vec<Hit>>,
}

pub struct MockUpstream {
    addr: SocketAddr,
    state: Arc<State>,
    server: JoinHandle<()>,
}

impl MockUpstream {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(State::default());
        let router = Arc::new(build_router());

        let server = tokio::spawn({
            let state = Arc::clone(&state);
            async move {
                loop {
                    let Ok((stream, _)) = listener.accept().await else {
                        return;
                    };
                    let io = TokioIo::new(stream);
                    let state = Arc::clone(&state);
                    let router = Arc::clone(&router);

                    tokio::spawn(async move {
                        let service = service_fn(move |req| {
                            handle_request(req, Arc::clone(&state), Arc::clone(&router))
                        });
                        let _ = http1::Builder::new().serve_connection(io, service).await;
                    });
                }
            }
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Catalog base URL served by this upstream.
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Configuration pointing at this upstream, with a credential.
    pub fn config(&self) -> Config {
        Config {
            base_url: self.base_url(),
            ..Config::default()
        }
        .with_api_key(API_KEY)
    }

    /// Configuration pointing at this upstream, without a credential.
    pub fn anonymous_config(&self) -> Config {
        Config {
            base_url: self.base_url(),
            ..Config::default()
        }
    }

    pub fn set_search(&self, response: Canned) {
        *self.state.search.lock().unwrap() = Some(response);
    }

    pub fn set_mod(&self, id: i64, response: Canned) {
        self.state.mods.lock().unwrap().insert(id.to_string(), response);
    }

    pub fn set_files(&self, id: i64, response: Canned) {
        self.state.files.lock().unwrap().insert(id.to_string(), response);
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.state.hits.lock().unwrap().clone()
    }

    /// Number of requests whose path starts with `prefix`.
    pub fn hits_on(&self, prefix: &str) -> usize {
        self.hits().iter().filter(|h| h.path.starts_with(prefix)).count()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// An address nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/v1")
}

async fn handle_request(
    req: Request<Incoming>,
    state: Arc<State>,
    router: Arc<Router<Route>>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    state.hits.lock().unwrap().push(Hit {
        method: method.clone(),
        path: path.clone(),
        query: req.uri().query().unwrap_or_default().to_string(),
        api_key: req
            .headers()
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let Ok(matched) = router.at(&path) else {
        return Ok(canned(Canned::status(404)));
    };
    let route = *matched.value;
    let param = |name: &str| matched.params.get(name).unwrap_or_default().to_string();

    let response = match route {
        Route::Search => {
            let search = state.search.lock().unwrap().clone();
            canned(search.unwrap_or_else(|| Canned::json(json!({ "data": [] }))))
        }
        Route::Mod => match state.mods.lock().unwrap().get(&param("id")) {
            Some(response) => canned(response.clone()),
            None => canned(Canned::status(404)),
        },
        Route::Files => match state.files.lock().unwrap().get(&param("id")) {
            Some(response) => canned(response.clone()),
            None => canned(Canned::json(json!({ "data": [] }))),
        },
        Route::File => file(None),
        Route::Attachment => file(Some(format!(r#"attachment; filename="{}""#, param("name")))),
        Route::Redirect => Response::builder()
            .status(StatusCode::TEMPORARY_REDIRECT)
            .header("Location", format!("/files/{}", param("name")))
            .body(Full::new(Bytes::new()))
            .unwrap(),
    };
    Ok(response)
}

fn canned(response: Canned) -> Response<Full<Bytes>> {
    Response::builder()
        .status(response.status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(response.body)))
        .unwrap()
}

fn file(disposition: Option<String>) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/zip")
        .header("Content-Length", FILE_SIZE.to_string());
    if let Some(disposition) = disposition {
        builder = builder.header("Content-Disposition", disposition);
    }
    builder
        .body(Full::new(Bytes::from(vec![0u8; FILE_SIZE])))
        .unwrap()
}

/// A search or detail item in the catalog's wire shape.
pub fn mod_json(id: i64, name: &str, categories: &[&str], modified: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "summary": format!("{name} summary"),
        "downloadCount": 1000 + id,
        "categories": categories.iter().map(|c| json!({ "name": c })).collect::<Vec<_>>(),
        "authors": [{ "name": "packdev" }],
        "logo": { "url": format!("https://media.example/{id}.png") },
        "dateModified": modified,
        "latestFilesIndexes": [{ "gameVersion": "1.20.1", "modLoader": 1 }]
    })
}

/// A file item in the catalog's wire shape.
pub fn file_json(id: i64, file_date: &str) -> Value {
    json!({
        "id": id,
        "displayName": format!("Pack {id}"),
        "fileName": format!("pack-{id}.zip"),
        "fileDate": file_date,
        "downloadUrl": format!("https://edge.example/files/pack-{id}.zip"),
        "gameVersions": ["1.20.1", "Forge"],
        "modLoader": null,
        "fileLength": 123456
    })
}
