extern crate requestbox;

use std::io::{Cursor, Read};

use requestbox::common::request::Request;
use requestbox::common::{method, version};
use requestbox::header_map;

/// Fills the request the way a connection layer does after tokenizing an exchange.
fn produce(
    request: &mut Request,
    method: &str,
    target: &str,
    headers: Vec<(&str, &str)>,
    body: &'static str,
) {
    request.set_method(method).unwrap();
    request.set_uri(target).unwrap();
    request.set_version(version::HTTP_VERSION_1_1);
    for (name, value) in headers {
        request.add_header(name, value).unwrap();
    }
    if !body.is_empty() {
        request.set_body_stream(Box::new(Cursor::new(body)));
    }
}

#[test]
fn full_pipeline_exchange() {
    let mut request = Request::new();

    // per-context configuration
    request.set_document_root("/var/www/shop.example");

    produce(
        &mut request,
        "post",
        "/shop/cart/items?id=42&ref=",
        vec![("Content-Type", "application/x-www-form-urlencoded"), ("Content-Length", "9")],
        "item=book",
    );

    // the routing layer resolves the handler boundary and injects a synthetic param
    request.set_script_name("/shop");
    request.set_param("session", "abc123");

    // what a handler observes
    assert!(method::is_known(request.method()));
    assert_eq!(request.method(), "POST");
    assert_eq!(request.uri(), "/shop/cart/items?id=42&ref=");
    assert_eq!(request.version(), "HTTP/1.1");
    assert_eq!(request.header("content-type"), Some("application/x-www-form-urlencoded"));
    assert!(request.has_header("CONTENT-LENGTH"));
    assert!(!request.has_header("X-Missing"));
    assert_eq!(request.query_string(), "id=42&ref=");
    assert_eq!(request.param("id"), Some("42"));
    assert_eq!(request.param("ref"), Some(""));
    assert_eq!(request.param("session"), Some("abc123"));
    assert_eq!(request.script_name(), "/shop");
    assert_eq!(request.path_info(), "/cart/items");
    assert_eq!(request.real_path(), "/var/www/shop.example/shop/cart/items");

    // the handler takes the body stream over and drains it
    let mut body = String::new();
    request.take_body_stream().unwrap().read_to_string(&mut body).unwrap();
    assert_eq!(body, "item=book");
    assert!(request.body_stream().is_none());
}

#[test]
fn worker_reuses_one_request_across_exchanges() {
    let mut request = Request::new();

    request.set_document_root("/var/www/a.example");
    produce(
        &mut request,
        "GET",
        "/blog/2014/03%20archive?page=2",
        vec![("Host", "a.example"), ("Accept", "text/html")],
        "",
    );
    request.set_script_name("/blog");

    assert_eq!(request.path_info(), "/2014/03 archive");
    assert_eq!(request.real_path(), "/var/www/a.example/blog/2014/03 archive");
    assert_eq!(request.param("page"), Some("2"));

    // exchange retired, the worker clears the value instead of allocating a new one
    request.init();

    assert_eq!(request.uri(), "");
    assert_eq!(request.method(), "");
    assert!(request.headers().is_empty());
    assert_eq!(request.query_string(), "");
    assert!(request.params().is_empty());
    assert_eq!(request.script_name(), "");
    assert_eq!(request.path_info(), "");
    assert_eq!(request.document_root(), "");
    assert_eq!(request.real_path(), "");
    assert!(request.body_stream().is_none());

    // nothing from the first exchange bleeds into the second
    request.set_document_root("/var/www/b.example");
    produce(
        &mut request,
        "GET",
        "/index",
        vec![("Host", "b.example")],
        "",
    );

    assert_eq!(request.header("host"), Some("b.example"));
    assert_eq!(request.param("page"), None);
    assert!(request.params().is_empty());
    assert_eq!(request.real_path(), "/var/www/b.example/index");
}

#[test]
fn bulk_headers_replace_parsed_ones() {
    let mut request = Request::new();
    produce(&mut request, "GET", "/", vec![("Host", "a.example")], "");

    request.set_headers(header_map![
        ("Host", "b.example"),
        ("Connection", "close"),
    ]);

    assert_eq!(request.header("host"), Some("b.example"));
    assert_eq!(request.header("connection"), Some("close"));
    assert_eq!(request.headers().len(), 2);
}

#[test]
fn body_stream_replacement_returns_prior_stream_unread() {
    let mut request = Request::new();
    produce(&mut request, "POST", "/upload", vec![], "first body");

    // a retry on the same exchange swaps a fresh stream in; the old one comes back out
    let mut old = request.set_body_stream(Box::new(Cursor::new("second body"))).unwrap();
    let mut contents = String::new();
    old.read_to_string(&mut contents).unwrap();
    assert_eq!(contents, "first body");

    let mut contents = String::new();
    request.body_stream().unwrap().read_to_string(&mut contents).unwrap();
    assert_eq!(contents, "second body");
}
