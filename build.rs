use std::process::Command;

/// Trimmed stdout of a successful command.
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn main() {
    // Packaged builds have no .git; let them pass the commit in.
    let commit_sha = std::env::var("CARTOGRAPH_COMMIT_SHA")
        .ok()
        .filter(|sha| !sha.is_empty())
        .or_else(|| command_output("git", &["rev-parse", "--short", "HEAD"]))
        .unwrap_or_else(|| "unknown".to_string());

    let build_date = command_output("date", &["-u", "+%Y-%m-%d"]).unwrap_or_else(|| "unknown".to_string());

    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    // "rustc 1.92.0 (abc 2025-01-01)" -> "1.92.0"
    let rustc_version = command_output(&rustc, &["--version"])
        .and_then(|line| line.split_whitespace().nth(1).map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=CARTOGRAPH_COMMIT_SHA={}", commit_sha);
    println!("cargo:rustc-env=CARTOGRAPH_BUILD_DATE={}", build_date);
    println!("cargo:rustc-env=CARTOGRAPH_RUSTC_VERSION={}", rustc_version);

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=CARTOGRAPH_COMMIT_SHA");
}
