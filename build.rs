use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output();

    let version = match output {
        Ok(o) if o.status.success() => {
            let git_output = String::from_utf8(o.stdout)
                .unwrap_or_default()
                .trim()
                .to_string();

            // Strip 'v' prefix if present (e.g., "v1.0.0" -> "1.0.0")
            let version = git_output.strip_prefix('v').unwrap_or(&git_output);

            if version.is_empty() || !version.starts_with(|c: char| c.is_ascii_digit()) {
                // Untagged checkout: `git describe --always` yields a bare hash
                std::env::var("CARGO_PKG_VERSION").unwrap_or_default()
            } else {
                version.to_string()
            }
        }
        // Not a git checkout (e.g. a source tarball)
        _ => std::env::var("CARGO_PKG_VERSION").unwrap_or_default(),
    };

    println!("cargo:rustc-env=FIG_INSTALLER_VERSION={}", version);
}
