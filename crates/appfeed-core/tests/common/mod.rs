#![allow(dead_code)]

pub mod api_server;

use std::io::Write;

/// Build an `.ipa` (zip) whose app Info.plist declares `bundle_id`.
pub fn ipa_bytes(app: &str, bundle_id: &str) -> Vec<u8> {
    let plist = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>CFBundleIdentifier</key>
    <string>{bundle_id}</string>
</dict>
</plist>
"#
    );
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut cursor);
        zip.start_file(
            format!("Payload/{app}.app/Info.plist"),
            zip::write::SimpleFileOptions::default(),
        )
        .unwrap();
        zip.write_all(plist.as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    cursor.into_inner()
}
