//! Tests for resource resolution.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;

    use crate::handler::{
        guess_content_type, percent_decode, strip_query_and_fragment, FileSystemHandler, Outcome,
        ResourceHandler,
    };
    use crate::parser::Method;

    const INDEX: &str = "<!DOCTYPE html><html><body>Hello</body></html>\n";

    fn document_root() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), INDEX).unwrap();
        fs::write(dir.path().join("notes.txt"), "plain notes").unwrap();
        fs::write(dir.path().join("with space.txt"), "spaced").unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs").join("index.html"), "docs index").unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        dir
    }

    fn success(outcome: Outcome) -> (Vec<String>, Vec<u8>) {
        match outcome {
            Outcome::Success { headers, body } => (headers, body),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn test_get_file() {
        let root = document_root();
        let handler = FileSystemHandler::new(root.path(), "test/1.0");
        let (headers, body) = success(handler.handle(Method::GET, "/notes.txt"));
        assert_eq!(
            headers,
            vec![
                "HTTP/1.0 200 OK\r\n",
                "Server: test/1.0\r\n",
                "Content-type: text/plain\r\n",
                "Content-length: 11\r\n",
                "\r\n",
            ]
        );
        assert_eq!(body, b"plain notes");
    }

    #[test]
    fn test_head_has_length_but_no_body() {
        let root = document_root();
        let handler = FileSystemHandler::new(root.path(), "test/1.0");
        let (headers, body) = success(handler.handle(Method::HEAD, "/index.html"));
        assert!(body.is_empty());
        assert!(headers.contains(&format!("Content-length: {}\r\n", INDEX.len())));
        assert!(headers.contains(&"Content-type: text/html\r\n".to_string()));
    }

    #[test]
    fn test_directory_resolves_to_index() {
        let root = document_root();
        let handler = FileSystemHandler::new(root.path(), "test/1.0");
        let (_, root_body) = success(handler.handle(Method::GET, "/"));
        let (_, index_body) = success(handler.handle(Method::GET, "/index.html"));
        assert_eq!(root_body, index_body);

        let (headers, body) = success(handler.handle(Method::GET, "/docs"));
        assert_eq!(body, b"docs index");
        assert!(headers.contains(&"Content-type: text/html\r\n".to_string()));
    }

    #[test]
    fn test_query_and_fragment_are_ignored() {
        let root = document_root();
        let handler = FileSystemHandler::new(root.path(), "test/1.0");
        let (_, body) = success(handler.handle(Method::GET, "/notes.txt?version=2#top"));
        assert_eq!(body, b"plain notes");
    }

    #[test]
    fn test_percent_encoded_path() {
        let root = document_root();
        let handler = FileSystemHandler::new(root.path(), "test/1.0");
        let (_, body) = success(handler.handle(Method::GET, "/with%20space.txt"));
        assert_eq!(body, b"spaced");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let root = document_root();
        let handler = FileSystemHandler::new(root.path(), "test/1.0");
        assert!(matches!(handler.handle(Method::GET, "/missing.txt"), Outcome::NotFound));
        assert!(matches!(handler.handle(Method::HEAD, "/missing.txt"), Outcome::NotFound));
    }

    #[test]
    fn test_directory_without_index_is_not_found() {
        let root = document_root();
        let handler = FileSystemHandler::new(root.path(), "test/1.0");
        assert!(matches!(handler.handle(Method::GET, "/empty/"), Outcome::NotFound));
    }

    #[test]
    fn test_resolve_stays_below_root() {
        let handler = FileSystemHandler::new("/srv/www", "test/1.0");
        assert_eq!(handler.resolve("/../../etc/passwd"), Path::new("/srv/www/etc/passwd"));
        assert_eq!(handler.resolve("/a/./b//c"), Path::new("/srv/www/a/b/c"));
        assert_eq!(handler.resolve("/%2e%2e/secret"), Path::new("/srv/www/secret"));
        assert_eq!(handler.resolve("/"), Path::new("/srv/www"));
    }

    #[test]
    fn test_closure_handler() {
        let handler = |_: crate::parser::Method, _: &str| Outcome::NotFound;
        assert!(matches!(handler.handle(Method::GET, "/"), Outcome::NotFound));
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("/a%20b"), "/a b");
        assert_eq!(percent_decode("/%C3%A9t%c3%a9"), "/\u{e9}t\u{e9}");
        assert_eq!(percent_decode("/100%"), "/100%");
        assert_eq!(percent_decode("/%zz%4"), "/%zz%4");
        assert_eq!(percent_decode("/%41"), "/A");
    }

    #[test]
    fn test_strip_query_and_fragment() {
        assert_eq!(strip_query_and_fragment("/a?b#c"), "/a");
        assert_eq!(strip_query_and_fragment("/a#b?c"), "/a");
        assert_eq!(strip_query_and_fragment("/plain"), "/plain");
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("index.html")), "text/html");
        assert_eq!(guess_content_type(Path::new("STYLE.CSS")), "text/css");
        assert_eq!(guess_content_type(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(guess_content_type(Path::new("archive.unknown")), "application/octet-stream");
        assert_eq!(guess_content_type(Path::new("Makefile")), "application/octet-stream");
    }
}
