use super::*;

#[test]
fn extension_sniffing_is_case_insensitive() {
    let t = FormatTable::default();
    assert_eq!(
        t.resolve(Path::new("a/B.GIF"), None).unwrap(),
        MediaKind::Animation
    );
    assert_eq!(
        t.resolve(Path::new("clip.Mp4"), None).unwrap(),
        MediaKind::Video
    );
    assert_eq!(
        t.resolve(Path::new("still.jpeg"), None).unwrap(),
        MediaKind::Image
    );
}

#[test]
fn declared_kind_overrides_extension() {
    let t = FormatTable::default();
    assert_eq!(
        t.resolve(Path::new("clip.gif"), Some(MediaKind::Video))
            .unwrap(),
        MediaKind::Video
    );
    assert_eq!(
        t.resolve(Path::new("noext"), Some(MediaKind::Image))
            .unwrap(),
        MediaKind::Image
    );
}

#[test]
fn unknown_extension_without_declaration_is_unsupported() {
    let t = FormatTable::default();
    for p in ["notes.txt", "noext", "archive.tar.gz"] {
        let err = t.resolve(Path::new(p), None).unwrap_err();
        assert_eq!(err.kind(), crate::BakeErrorKind::UnsupportedFormat, "{p}");
    }
}

#[test]
fn custom_table_normalizes_entries() {
    let t = FormatTable::new([".APNG"], Vec::<&str>::new(), ["png"]);
    assert_eq!(t.kind_for_extension("apng"), Some(MediaKind::Animation));
    assert_eq!(t.kind_for_extension("mp4"), None);
    assert_eq!(t.kind_for_extension(".PNG"), Some(MediaKind::Image));
}
