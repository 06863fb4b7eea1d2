use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    #[cfg(not(any(feature = "sqlite", feature = "postgres")))]
    println!("cargo:warning=no SQL backend feature enabled, only STORAGE_BACKEND=memory is available");

    let commit_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_string())
        .filter(|hash| !hash.is_empty());
    if let Some(hash) = commit_hash {
        println!("cargo:rustc-env=PROTEUS_COMMIT_HASH={hash}");
    }

    if let Ok(elapsed) = SystemTime::now().duration_since(UNIX_EPOCH) {
        println!("cargo:rustc-env=PROTEUS_BUILD_TIMESTAMP={}", elapsed.as_secs());
    }

    println!("cargo:rerun-if-changed=migrations");
    println!("cargo:rerun-if-changed=.git/HEAD");
}
