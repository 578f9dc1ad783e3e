//! End-to-end tests of `HttpTransport` against a local fake provider.

use std::io::Read;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use steamwebmail::{Credentials, WebMail};
use tiny_http::{Header, Response, Server};

/// What the fake provider saw for one request.
#[derive(Debug)]
struct Captured {
    method: String,
    url: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Captured {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn header_count(&self, name: &str) -> usize {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .count()
    }
}

/// Serve `replies` in order (body, extra headers), then stop.
fn fake_provider(
    replies: Vec<(String, Vec<(&'static str, &'static str)>)>,
) -> (String, mpsc::Receiver<Captured>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let base = format!("http://{}/", server.server_addr());
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for (body, extra) in replies {
            let Ok(mut request) = server.recv() else {
                return;
            };
            let mut req_body = String::new();
            let _ = request.as_reader().read_to_string(&mut req_body);
            let captured = Captured {
                method: request.method().to_string(),
                url: request.url().to_string(),
                headers: request
                    .headers()
                    .iter()
                    .map(|h| (h.field.to_string(), h.value.to_string()))
                    .collect(),
                body: req_body,
            };
            let _ = tx.send(captured);

            let mut response = Response::from_string(body);
            for (k, v) in extra {
                response.add_header(Header::from_bytes(k.as_bytes(), v.as_bytes()).unwrap());
            }
            let _ = request.respond(response);
        }
    });

    (base, rx)
}

fn app_data(token: &str, hash: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><script>\nwindow.__initAppData({{\"System\":{{\"token\":\"{token}\"}},\"AuthAccountHash\":\"{hash}\"}});\n</script></head></html>"
    )
}

fn client(base: &str) -> WebMail {
    WebMail::connect(
        Credentials::new("player@steamwebmail.com", "p&ss word"),
        base,
        Duration::from_secs(5),
    )
    .unwrap()
}

#[test]
fn login_round_trip_over_http() {
    let (base, rx) = fake_provider(vec![
        (
            app_data("guest-tok", ""),
            vec![("Set-Cookie", "smsession=abc123; Path=/")],
        ),
        (r#"{"Action":"Login","Result":true}"#.to_string(), vec![]),
        (app_data("auth-tok", "hash-42"), vec![]),
        (
            r#"{"Result":{"@Collection":[{"Uid":"5","Subject":"Steam Guard","From":[{"Email":"noreply@steampowered.com"}],"DateRaw":"d5"}]}}"#
                .to_string(),
            vec![],
        ),
    ]);

    let mut mail = client(&base);
    assert!(mail.authenticate());
    assert_eq!(mail.session().account_hash, "hash-42");

    let messages = mail.get_messages("INBOX", 1);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].from, "noreply@steampowered.com");

    let bootstrap = rx.recv().unwrap();
    assert_eq!(bootstrap.method, "GET");
    assert!(bootstrap.url.starts_with("/?/AppData@no-mobile-0/0/"));
    assert_eq!(
        bootstrap.header("User-Agent"),
        Some("Mozilla/5.0 (X11; Linux x86_64; rv:147.0) Gecko/20100101 Firefox/147.0")
    );
    assert_eq!(
        bootstrap.header("Accept"),
        Some("application/json, text/javascript, */*; q=0.01")
    );
    assert_eq!(bootstrap.header("X-Requested-With"), Some("XMLHttpRequest"));
    assert_eq!(bootstrap.header("Origin"), Some("https://steamwebmail.com"));
    assert_eq!(bootstrap.header("Referer"), Some("https://steamwebmail.com/"));

    let login = rx.recv().unwrap();
    assert_eq!(login.method, "POST");
    assert_eq!(login.url, "/?/Ajax/&q[]=/0/");
    assert_eq!(
        login.header("Content-Type"),
        Some("application/x-www-form-urlencoded; charset=UTF-8")
    );
    assert_eq!(login.header_count("Content-Type"), 1);
    assert_eq!(
        login.body,
        "Email=player%40steamwebmail.com&Login=&Password=p%26ss+word&Language=&AdditionalCode=\
         &AdditionalCodeSignMe=0&SignMe=0&Action=Login&XToken=guest-tok"
    );
    assert_eq!(login.header("Cookie"), Some("smsession=abc123"));

    let confirm = rx.recv().unwrap();
    assert!(confirm.url.starts_with("/?/AppData@no-mobile-0/0/"));

    let listing = rx.recv().unwrap();
    assert_eq!(listing.url, "/?/Ajax/&q[]=/hash-42/");
    assert_eq!(
        listing.header("Content-Type"),
        Some("application/x-www-form-urlencoded; charset=UTF-8")
    );
    assert_eq!(listing.header_count("Content-Type"), 1);
    assert_eq!(
        listing.body,
        "Action=MessageList&Folder=INBOX&Page=1&Offset=0&Search=&XToken=auth-tok"
    );
}

#[test]
fn unreachable_proxy_fails_softly() {
    let credentials = Credentials::new("player@steamwebmail.com", "pw")
        .with_proxy(Some("http://127.0.0.1:9".to_string()));
    let mut mail = WebMail::connect(
        credentials,
        "http://steamwebmail.invalid/",
        Duration::from_secs(2),
    )
    .unwrap();

    assert!(!mail.authenticate());
    assert!(mail.session().is_guest_scope());
    assert!(mail.get_messages("INBOX", 1).is_empty());
    assert_eq!(mail.get_message_body("1", "INBOX"), "");
    assert!(mail.get_folders().is_err());
}

#[test]
fn invalid_proxy_is_rejected_at_construction() {
    let credentials = Credentials::new("player@steamwebmail.com", "pw")
        .with_proxy(Some("http://[::1".to_string()));
    assert!(WebMail::connect(credentials, "http://127.0.0.1/", Duration::from_secs(1)).is_err());
}
