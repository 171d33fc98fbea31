use json_consumer::{unmarshal, Error, Skip, Stream};

#[test]
fn test_error_messages() {
    let entries = [
        (
            b"".as_slice(),
            "unexpected end of JSON input: expected a value",
        ),
        (b"\n}", "JSON syntax error: Closing a not opened object"),
        (b"[1 2]", "JSON syntax error: Array values should be followed by a comma or the array end"),
        (
            b"\"\n\"",
            "JSON syntax error: Control characters are not allowed in JSON strings",
        ),
        (
            b"\"\\uDCFF\\u0000\"",
            "JSON syntax error: \\uDCFF\\u0000 is an invalid surrogate pair",
        ),
        (b"[tru]", "JSON syntax error: true expected, found tru]"),
        (b"{\"a\" 1}", "JSON syntax error: Object keys should be followed by ':'"),
        (b"[1, {\"a\": ", "unexpected end of JSON input: expected the end of the skipped value"),
    ];
    for (json, error) in entries {
        assert_eq!(
            unmarshal(&mut Skip, json).unwrap_err().to_string(),
            error,
            "on {}",
            String::from_utf8_lossy(json)
        );
    }
}

#[test]
fn test_classification() {
    let premature_end: [&[u8]; 7] = [
        b"",
        b"[",
        b"{\"a\":",
        b"\"abc",
        b"[1,",
        b"\"\\ud800",
        b"\"\\ud800\\",
    ];
    for json in premature_end {
        let error = unmarshal(&mut Skip, json).unwrap_err();
        assert!(
            error.is_premature_end(),
            "on {}: {error}",
            String::from_utf8_lossy(json)
        );
    }

    let syntax: [&[u8]; 8] = [
        b"[1,]",
        b"{\"a\":1,}",
        b"[\"\x00\"]",
        b"-x",
        br#"["\ud800"]"#,
        br#""\ud800""#,
        br#""\ud800\n""#,
        br#""\ud800\u0041""#,
    ];
    for json in syntax {
        let error = unmarshal(&mut Skip, json).unwrap_err();
        assert!(
            matches!(error, Error::Syntax(_)),
            "on {}: {error}",
            String::from_utf8_lossy(json)
        );
    }
}

#[test]
fn test_io_errors_are_kept() {
    struct Failing;

    impl std::io::Read for Failing {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "broken pipe"))
        }
    }

    let error = Stream::new(std::io::BufReader::new(Failing))
        .skip_value()
        .unwrap_err();
    assert!(matches!(error, Error::Io(_)), "{error}");
    assert_eq!(error.to_string(), "broken pipe");
}
