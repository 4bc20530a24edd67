use colly::loader::{ContentLoader, SkipReason};
use tempfile::tempdir;
use tokio::fs;

#[tokio::test]
async fn test_loads_utf8_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hello.rs");
    fs::write(&path, "fn main() { println!(\"héllo\"); }\n")
        .await
        .unwrap();

    let entry = ContentLoader::new(encoding_rs::UTF_8)
        .load(&path)
        .await
        .unwrap_or_else(|e| panic!("Failed to load: {:?}", e));

    assert_eq!(entry.encoding, encoding_rs::UTF_8);
    assert_eq!(entry.text, "fn main() { println!(\"héllo\"); }\n");
    assert!(entry.transformations.is_empty());
}

#[tokio::test]
async fn test_falls_back_to_configured_encoding() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("latin.txt");
    fs::write(&path, [0x63, 0x61, 0x66, 0xE9]).await.unwrap();

    let entry = ContentLoader::new(encoding_rs::WINDOWS_1252)
        .load(&path)
        .await
        .unwrap();

    assert_eq!(entry.text, "café");
    assert_eq!(entry.encoding, encoding_rs::WINDOWS_1252);
}

#[tokio::test]
async fn test_undecodable_file_is_skipped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("latin.txt");
    fs::write(&path, [0x63, 0x61, 0x66, 0xE9]).await.unwrap();

    let skip = ContentLoader::new(encoding_rs::UTF_8)
        .load(&path)
        .await
        .unwrap_err();

    assert_eq!(skip.path, path);
    assert_eq!(skip.reason, SkipReason::Undecodable("UTF-8"));
}

#[tokio::test]
async fn test_byte_order_mark_wins() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wide.txt");
    fs::write(&path, [0xFF, 0xFE, b'h', 0x00, b'i', 0x00])
        .await
        .unwrap();

    let entry = ContentLoader::new(encoding_rs::UTF_8)
        .load(&path)
        .await
        .unwrap();

    assert_eq!(entry.text, "hi");
    assert_eq!(entry.encoding, encoding_rs::UTF_16LE);
}

#[tokio::test]
async fn test_binary_file_is_skipped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blob.bin");
    fs::write(&path, [0x7F, b'E', b'L', b'F', 0x00, 0x01]).await.unwrap();

    let skip = ContentLoader::new(encoding_rs::UTF_8)
        .load(&path)
        .await
        .unwrap_err();

    assert_eq!(skip.reason, SkipReason::Binary);
}

#[tokio::test]
async fn test_missing_file_is_a_read_skip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gone.txt");

    let skip = ContentLoader::new(encoding_rs::UTF_8)
        .load(&path)
        .await
        .unwrap_err();

    assert!(matches!(skip.reason, SkipReason::Read(_)), "{:?}", skip);
}

#[cfg(unix)]
#[tokio::test]
async fn test_permission_denied_is_a_read_skip() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let path = dir.path().join("secret.txt");
    fs::write(&path, "classified").await.unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still read the file.
    if std::fs::read(&path).is_ok() {
        return;
    }

    let skip = ContentLoader::new(encoding_rs::UTF_8)
        .load(&path)
        .await
        .unwrap_err();
    assert!(matches!(skip.reason, SkipReason::Read(_)), "{:?}", skip);
}
