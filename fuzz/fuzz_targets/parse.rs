#![no_main]
use libfuzzer_sys::fuzz_target;
use plain_uri::Uri;

fuzz_target!(|data: &str| {
    let Ok(u) = Uri::parse(data) else {
        assert_eq!(Uri::parse(data).err(), Uri::parse(data).err());
        return;
    };
    assert_eq!(Some(u), Uri::parse(data).ok());

    let mut buf = String::with_capacity(data.len());
    buf.push_str(u.scheme().as_str());
    buf.push(':');
    assert!(!u.scheme().as_str().is_empty());

    if let Some(a) = u.authority() {
        buf.push_str("//");
        let start = buf.len();
        if !a.userinfo().is_empty() || a.as_str().contains('@') {
            buf.push_str(a.userinfo());
            buf.push('@');
        }
        buf.push_str(a.host());
        if !a.port().is_empty() || a.as_str().len() > buf.len() - start {
            buf.push(':');
            buf.push_str(a.port());
        }
        assert_eq!(&buf[start..], a.as_str());
    }

    let path = u.path().as_str();
    assert!(!path.contains(|c: char| c == '?' || c == '#'));
    buf.push_str(path);

    if let Some(q) = u.query() {
        assert!(q.pairs().all(|(k, _)| !k.is_empty()));
        buf.push('?');
        buf.push_str(q.as_str());
    }
    if u.has_fragment() {
        buf.push('#');
        buf.push_str(u.fragment());
    }
    assert_eq!(data, buf);
});
