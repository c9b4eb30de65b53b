//! Installed package listing via the Homebrew CLI.

use std::process::Command;

/// Ask the package manager for its installed package identifiers, in the
/// order it reports them.
///
/// Invocation failure is reported and degrades to an empty list; the
/// surrounding flow carries on to script emission regardless.
pub fn installed_packages(brew_command: &str) -> Vec<String> {
    let mut parts = brew_command.split_whitespace();
    let Some(program) = parts.next() else {
        tracing::warn!("empty package manager command configured");
        return Vec::new();
    };

    let output = Command::new(program).args(parts).arg("list").output();
    match output {
        Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect(),
        Ok(output) => {
            tracing::warn!(status = %output.status, "package manager list failed");
            println!("Error: Unable to list Homebrew packages.");
            Vec::new()
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to invoke package manager");
            println!("Error: Unable to list Homebrew packages.");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn write_script(dir: &std::path::Path, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("fakebrew");
        std::fs::write(&path, body).expect("write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("mark script executable");
        path.to_str().expect("utf8 path").to_owned()
    }

    #[cfg(unix)]
    #[test]
    fn lists_stdout_lines_in_reported_order() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "#!/bin/sh\nprintf 'zeta\\nalpha\\n'\n");
        assert_eq!(installed_packages(&script), ["zeta", "alpha"]);
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "#!/bin/sh\nexit 1\n");
        assert!(installed_packages(&script).is_empty());
    }

    #[test]
    fn missing_program_degrades_to_empty() {
        assert!(installed_packages("/definitely/not/a/real/brew").is_empty());
    }

    #[test]
    fn empty_command_degrades_to_empty() {
        assert!(installed_packages("   ").is_empty());
    }
}
