//! Edge case tests for uxf-par, including on-disk import resolution.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::path::Path;

    use crate::{parse, ParseOptions};
    use uxf_model::{Uxf, Value};
    use uxf_util::{codes, MemoryReporter};

    fn write(dir: &Path, name: &str, text: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn load(path: &str, options: &ParseOptions) -> (uxf_util::Result<Uxf>, MemoryReporter) {
        let mut reporter = MemoryReporter::new();
        let text = uxf_util::io::read_text(Path::new(path)).unwrap();
        let result = parse(&text, path, options, &mut reporter);
        (result, reporter)
    }

    #[test]
    fn test_file_import_merges_tclasses() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "shapes.uxf", "uxf 1.0\n=point x:int y:int\n[]\n");
        let main = write(
            dir.path(),
            "main.uxf",
            "uxf 1.0\n!shapes.uxf\n[(point 1 2)]\n",
        );
        let (result, reporter) = load(&main, &ParseOptions::default());
        let uxo = result.unwrap();
        assert!(uxo.tclasses.contains_key("point"));
        assert_eq!(uxo.imports.get("point").map(String::as_str), Some("shapes.uxf"));
        assert!(!reporter.has(codes::UNUSED_TTYPE));
    }

    #[test]
    fn test_imported_but_unused_not_warned() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "shapes.uxf", "uxf 1.0\n=point x y\n=size w h\n[]\n");
        let main = write(dir.path(), "main.uxf", "uxf 1.0\n!shapes.uxf\n[]\n");
        let (result, reporter) = load(&main, &ParseOptions::default());
        assert!(result.is_ok());
        assert!(!reporter.has(codes::UNUSED_TTYPE));
        assert!(!reporter.has(codes::UNUSED_TTYPES));
    }

    #[test]
    fn test_duplicate_import_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "shapes.uxf", "uxf 1.0\n=point x y\n[]\n");
        let main = write(
            dir.path(),
            "main.uxf",
            "uxf 1.0\n!shapes.uxf\n!shapes.uxf\n[(point 1 2)]\n",
        );
        let (result, reporter) = load(&main, &ParseOptions::default());
        let uxo = result.unwrap();
        assert_eq!(uxo.tclasses.len(), 1);
        assert!(!reporter.has(codes::CIRCULAR_IMPORT));
    }

    #[test]
    fn test_diamond_import_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "base.uxf", "uxf 1.0\n=point x y\n[]\n");
        write(dir.path(), "left.uxf", "uxf 1.0\n!base.uxf\n[]\n");
        write(dir.path(), "right.uxf", "uxf 1.0\n!base.uxf\n[]\n");
        let main = write(
            dir.path(),
            "main.uxf",
            "uxf 1.0\n!left.uxf\n!right.uxf\n[(point 1 2)]\n",
        );
        let (result, _) = load(&main, &ParseOptions::default());
        assert!(result.is_ok());
    }

    #[test]
    fn test_import_cycle_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.uxf", "uxf 1.0\n!a.uxf\n[]\n");
        let a = write(dir.path(), "a.uxf", "uxf 1.0\n!b.uxf\n[]\n");
        let (result, _) = load(&a, &ParseOptions::default());
        assert_eq!(result.unwrap_err().code(), Some(codes::CIRCULAR_IMPORT));
    }

    #[test]
    fn test_self_import_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "solo.uxf", "uxf 1.0\n!solo.uxf\n[]\n");
        let (result, _) = load(&a, &ParseOptions::default());
        assert_eq!(result.unwrap_err().code(), Some(codes::CIRCULAR_IMPORT));
    }

    #[test]
    fn test_missing_import_reports_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let main = write(dir.path(), "main.uxf", "uxf 1.0\n!nosuch.uxf\n[]\n");
        let (result, reporter) = load(&main, &ParseOptions::default());
        assert!(result.is_ok());
        assert!(reporter.has(codes::IMPORT_LOAD_FAILED));
    }

    #[test]
    fn test_transitive_import() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "base.uxf", "uxf 1.0\n=point x y\n[]\n");
        write(dir.path(), "mid.uxf", "uxf 1.0\n!base.uxf\n=pair a:point b:point\n[]\n");
        let main = write(
            dir.path(),
            "main.uxf",
            "uxf 1.0\n!mid.uxf\n[(pair (point 1 2) (point 3 4))]\n",
        );
        let (result, _) = load(&main, &ParseOptions::default());
        let uxo = result.unwrap();
        assert!(uxo.tclasses.contains_key("point"));
        assert!(uxo.tclasses.contains_key("pair"));
        // both arrived through the same direct import
        assert_eq!(uxo.import_filenames(), vec!["mid.uxf"]);
    }

    #[test]
    fn test_conflicting_imported_ttype_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "shapes.uxf", "uxf 1.0\n=point x y z\n[]\n");
        let main = write(
            dir.path(),
            "main.uxf",
            "uxf 1.0\n!shapes.uxf\n=point x y\n[(point 1 2)]\n",
        );
        // the local definition conflicts with the imported one
        let (result, _) = load(&main, &ParseOptions::default());
        assert!(matches!(
            result.unwrap_err().code(),
            Some(codes::CONFLICTING_TTYPE) | Some(codes::CONFLICTING_TTYPE_AT_END)
        ));
    }

    #[test]
    fn test_replace_imports_makes_standalone() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "shapes.uxf", "uxf 1.0\n=point x y\n=size w h\n[]\n");
        let main = write(
            dir.path(),
            "main.uxf",
            "uxf 1.0\n!shapes.uxf\n[(point 1 2)]\n",
        );
        let options = ParseOptions {
            replace_imports: true,
            ..ParseOptions::default()
        };
        let (result, _) = load(&main, &options);
        let uxo = result.unwrap();
        assert!(uxo.imports.is_empty());
        assert!(uxo.tclasses.contains_key("point"));
        assert!(!uxo.tclasses.contains_key("size"));
    }

    #[test]
    fn test_drop_unused_drops_empty_import() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "shapes.uxf", "uxf 1.0\n=size w h\n[]\n");
        let main = write(dir.path(), "main.uxf", "uxf 1.0\n!shapes.uxf\n[]\n");
        let options = ParseOptions {
            drop_unused: true,
            ..ParseOptions::default()
        };
        let (result, _) = load(&main, &options);
        let uxo = result.unwrap();
        assert!(uxo.tclasses.is_empty());
        assert!(uxo.imports.is_empty());
    }

    #[test]
    fn test_uxf_path_searched() {
        let lib_dir = tempfile::tempdir().unwrap();
        let doc_dir = tempfile::tempdir().unwrap();
        write(lib_dir.path(), "shared.uxf", "uxf 1.0\n=point x y\n[]\n");
        let main = write(
            doc_dir.path(),
            "main.uxf",
            "uxf 1.0\n!shared.uxf\n[(point 1 2)]\n",
        );
        std::env::set_var("UXF_PATH", lib_dir.path());
        let (result, _) = load(&main, &ParseOptions::default());
        std::env::remove_var("UXF_PATH");
        let uxo = result.unwrap();
        assert!(uxo.tclasses.contains_key("point"));
    }

    /// Serves `pages` (path to body) for exactly `hits` requests.
    fn spawn_http_server(listener: TcpListener, pages: HashMap<String, String>, hits: usize) {
        std::thread::spawn(move || {
            for _ in 0..hits {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                let mut buf = [0u8; 2048];
                let n = stream.read(&mut buf).unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).into_owned();
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let body = pages.get(&path).cloned().unwrap_or_default();
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
    }

    #[test]
    fn test_url_import_merges_tclasses() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let pages = HashMap::from([(
            "/shapes.uxf".to_string(),
            "uxf 1.0\n=point x y\n[]\n".to_string(),
        )]);
        spawn_http_server(listener, pages, 1);
        let url = format!("{base}/shapes.uxf");
        let mut reporter = MemoryReporter::new();
        let uxo = parse(
            &format!("uxf 1.0\n!{url}\n[(point 1 2)]\n"),
            "-",
            &ParseOptions::default(),
            &mut reporter,
        )
        .unwrap();
        assert!(uxo.tclasses.contains_key("point"));
        assert_eq!(
            uxo.imports.get("point").map(String::as_str),
            Some(url.as_str())
        );
    }

    #[test]
    fn test_url_import_cycle_is_fatal() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let pages = HashMap::from([
            (
                "/a.uxf".to_string(),
                format!("uxf 1.0\n!{base}/b.uxf\n[]\n"),
            ),
            (
                "/b.uxf".to_string(),
                format!("uxf 1.0\n!{base}/a.uxf\n[]\n"),
            ),
        ]);
        spawn_http_server(listener, pages, 2);
        let mut reporter = MemoryReporter::new();
        let err = parse(
            &format!("uxf 1.0\n!{base}/a.uxf\n[]\n"),
            "-",
            &ParseOptions::default(),
            &mut reporter,
        )
        .unwrap_err();
        assert_eq!(err.code(), Some(codes::CIRCULAR_IMPORT));
    }

    #[test]
    fn test_gzipped_import() {
        let dir = tempfile::tempdir().unwrap();
        let gz = dir.path().join("shapes.uxf.gz");
        uxf_util::io::write_text(&gz, "uxf 1.0\n=point x y\n[]\n").unwrap();
        let main = write(
            dir.path(),
            "main.uxf",
            "uxf 1.0\n!shapes.uxf.gz\n[(point 1 2)]\n",
        );
        let (result, _) = load(&main, &ParseOptions::default());
        assert!(result.unwrap().tclasses.contains_key("point"));
    }

    // ------------------------------------------------------- non-import edges

    fn parse_str(text: &str) -> (Uxf, MemoryReporter) {
        let mut reporter = MemoryReporter::new();
        let uxo = parse(text, "-", &ParseOptions::default(), &mut reporter).unwrap();
        (uxo, reporter)
    }

    #[test]
    fn test_edge_map_mixed_key_kinds_without_ktype() {
        let (uxo, _) = parse_str("uxf 1.0\n{1 <a> <k> 2 2023-01-15 yes}\n");
        assert_eq!(uxo.value().as_map().unwrap().len(), 3);
    }

    #[test]
    fn test_edge_single_record_table() {
        let (uxo, _) = parse_str("uxf 1.0\n=rgb r:int g:int b:int\n(rgb 0 128 255)\n");
        let table = uxo.value().as_table().unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_edge_table_of_nulls() {
        let (uxo, _) = parse_str("uxf 1.0\n=pair a b\n(pair ? ? ? ?)\n");
        let table = uxo.value().as_table().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0), Some(&[Value::Null, Value::Null][..]));
    }

    #[test]
    fn test_edge_map_value_collections() {
        let (uxo, _) = parse_str("uxf 1.0\n{<lists> [1 2] <maps> {}}\n");
        let map = uxo.value().as_map().unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_edge_list_of_fieldless_tables() {
        let (uxo, reporter) = parse_str("uxf 1.0\n=go\n=stop\n[(go) (stop) (go)]\n");
        assert_eq!(uxo.value().as_list().unwrap().len(), 3);
        assert!(!reporter.has(codes::UNUSED_TTYPE));
    }

    #[test]
    fn test_edge_deep_nesting_within_limit() {
        let depth = 64;
        let text = format!("uxf 1.0\n{}{}\n", "[".repeat(depth), "]".repeat(depth));
        let (uxo, _) = parse_str(&text);
        assert!(uxo.value().as_list().is_some());
    }

    #[test]
    fn test_edge_ttype_casing_preserved_but_compared_insensitively() {
        let (uxo, reporter) = parse_str("uxf 1.0\n=Point x y\n[Point (Point 1 2)]\n");
        assert!(uxo.tclasses.contains_key("Point"));
        assert!(!reporter.has(codes::UNUSED_TTYPE));
    }
}
