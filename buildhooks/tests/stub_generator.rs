//! Drives `codegen-dispatch` against a shell script that behaves like
//! gdbus-codegen: it records its argv and writes `<base>.c`/`<base>.h`.
//!
//! Kept to a single test so no other thread forks while the script is being
//! written (exec would fail with ETXTBSY).

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::Command;

const STUB: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    --generate-c-code=*) base="${arg#--generate-c-code=}" ;;
    --output-directory=*) dir="${arg#--output-directory=}" ;;
  esac
done
printf '%s\n' "$@" > "$dir/argv.txt"
: > "$dir/$base.c"
: > "$dir/$base.h"
"#;

fn write_stub(dir: &Path) -> String {
    let path = dir.join("gdbus-codegen-stub");
    std::fs::write(&path, STUB).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn stub_generator_end_to_end() {
    let tools = tempfile::tempdir().unwrap();
    let stub = write_stub(tools.path());
    let out = tempfile::tempdir().unwrap();
    let out_dir = out.path().to_str().unwrap();

    let marker = out.path().join("example-generated.codegen-failed");
    std::fs::write(&marker, "stale").unwrap();

    let run = || {
        Command::new(env!("CARGO_BIN_EXE_codegen-dispatch"))
            .args(["--tool", &stub, "--on-failure", "propagate"])
            .args([
                "org.example.",
                "example-generated",
                "ExampleNS",
                out_dir,
                "example.xml",
            ])
            .output()
            .expect("run codegen-dispatch")
    };

    let first = run();
    assert_eq!(
        first.status.code(),
        Some(0),
        "{}",
        String::from_utf8_lossy(&first.stderr)
    );
    assert!(out.path().join("example-generated.c").exists());
    assert!(out.path().join("example-generated.h").exists());
    assert!(!marker.exists(), "stale marker should be cleared on success");

    let argv = std::fs::read_to_string(out.path().join("argv.txt")).unwrap();
    let expected = format!(
        "--interface-prefix=org.example.\n\
         --generate-c-code=example-generated\n\
         --c-namespace=ExampleNS\n\
         --output-directory={out_dir}\n\
         example.xml\n"
    );
    assert_eq!(argv, expected);

    let second = run();
    assert_eq!(second.status.code(), Some(0));
    let argv_again = std::fs::read_to_string(out.path().join("argv.txt")).unwrap();
    assert_eq!(argv, argv_again);
}
