mod common;

use std::fs;

use rebrew::infra::config::Config;
use rebrew::infra::console::ScriptedConsole;
use rebrew::ui::app::WizardApp;

#[cfg(unix)]
#[test]
fn full_wizard_run_compiles_the_expected_script() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempfile::tempdir().unwrap();
    let apps = temp.path().join("Applications");
    fs::create_dir_all(apps.join("Alpha.app")).unwrap();
    fs::create_dir_all(apps.join("Beta.app")).unwrap();

    let home = temp.path().join("home");
    fs::create_dir_all(&home).unwrap();
    fs::write(home.join(".zshrc"), "export EDITOR=hx\n").unwrap();

    let brew = temp.path().join("fakebrew");
    fs::write(&brew, "#!/bin/sh\nprintf 'pkg-one\\npkg-two\\n'\n").unwrap();
    fs::set_permissions(&brew, fs::Permissions::from_mode(0o755)).unwrap();

    // Candidates scan to ["alpha", "beta"]; only alpha exists as a cask.
    let catalog_url = common::spawn_catalog_server(vec!["alpha".into()]);
    let output = temp.path().join("out/setup.sh");

    let mut config = Config::default();
    config.defaults.catalog_base_url = catalog_url;
    config.defaults.brew_command = brew.to_str().unwrap().to_owned();
    config.scan.app_dirs = vec![apps.to_str().unwrap().to_owned()];
    config.shell.files = vec![".zshrc".into()];

    let commands = [
        "y", // include cask 'alpha'
        "y", // include 'pkg-one'
        "n", // exclude 'pkg-two'
        "y", // capture .zshrc
        "o", // overwrite strategy
        "y", // add a post-run script
        "echo done",
        "end",
        "y", // refresh Dock and Finder
    ];
    let console = ScriptedConsole::new(commands);
    let mut app =
        WizardApp::with_console(config, Some(output.clone()), console).with_home_dir(home);
    app.run().unwrap();

    let script = fs::read_to_string(&output).unwrap();
    assert!(script.starts_with("#!/bin/bash"));
    assert!(script.contains("brew install --cask alpha\n"));
    assert!(script.contains("brew install pkg-one\n"));
    assert!(!script.contains("pkg-two"));
    assert!(script.contains("base64 --decode > ~/.zshrc"));
    assert!(script.contains("echo done\n"));
    assert!(script.contains("killall Dock Finder\n"));
    assert!(script.trim_end().ends_with("echo 'Configuration complete.'"));

    let mode = fs::metadata(&output).unwrap().permissions().mode();
    assert_eq!(mode & 0o111, 0o111, "script should be executable");
}

#[cfg(unix)]
#[test]
fn wizard_reaches_emission_when_every_collaborator_degrades() {
    let temp = tempfile::tempdir().unwrap();
    let home = temp.path().join("home");
    fs::create_dir_all(&home).unwrap();

    let output = temp.path().join("setup.sh");

    // No app dirs, no reachable catalog, no working brew, no dotfiles.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut config = Config::default();
    config.defaults.catalog_base_url = format!("http://127.0.0.1:{port}/cask");
    config.defaults.brew_command = "/definitely/not/a/real/brew".into();
    config.scan.app_dirs = vec![temp.path().join("missing").to_str().unwrap().to_owned()];
    config.shell.files = vec![".zshrc".into()];

    // Only the post-run and refresh prompts remain.
    let console = ScriptedConsole::new(["n", "n"]);
    let mut app =
        WizardApp::with_console(config, Some(output.clone()), console).with_home_dir(home);
    app.run().unwrap();

    let script = fs::read_to_string(&output).unwrap();
    assert!(script.contains("[1/5]"));
    assert!(!script.contains("brew install "));
    assert!(!script.contains("killall"));
}
