use std::path::Path;

/// `daylio-bridge` running in `dir` with no config file and no
/// `DAYLIO_BRIDGE_*` variables inherited from the host.
pub fn bridge_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("daylio-bridge");
    for (key, _) in std::env::vars_os() {
        if key.to_string_lossy().starts_with("DAYLIO_BRIDGE_") {
            cmd.env_remove(&key);
        }
    }
    cmd.current_dir(dir)
        .env("DAYLIO_BRIDGE_HOME", dir)
        .env("DAYLIO_BRIDGE_CONFIG_PATH", dir.join("missing-config.toml"));
    cmd
}
