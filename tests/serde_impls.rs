#![cfg(feature = "serde")]

use plain_uri::Uri;

#[test]
fn serialize() {
    let u = Uri::parse("http://user@h:8080/p?a=1&a=2#f").unwrap();
    assert_eq!(
        serde_json::to_string(&u).unwrap(),
        r#""http://user@h:8080/p?a=1&a=2#f""#
    );
    assert_eq!(
        serde_json::to_string(&u.authority()).unwrap(),
        r#"{"userinfo":"user","host":"h","port":"8080"}"#
    );
    assert_eq!(
        serde_json::to_string(&u.query_map()).unwrap(),
        r#"{"a":"1,2"}"#
    );
}

#[test]
fn deserialize() {
    let u: Uri<&str> = serde_json::from_str(r#""mailto:foo@bar.com""#).unwrap();
    assert_eq!(u.path(), "foo@bar.com");

    let u: Uri<String> = serde_json::from_str(r#""http://h/?k=v""#).unwrap();
    assert_eq!(u.query_map().get("k"), Some("v"));

    let e = serde_json::from_str::<Uri<String>>(r#""http://h/?=v""#).unwrap_err();
    assert!(e
        .to_string()
        .starts_with(r#"failed to parse "http://h/?=v" as URI: empty query key at index 10"#));
}
