use std::env;
use std::path::PathBuf;

mod generated {
    include!(concat!(env!("OUT_DIR"), "/env_allowlist.rs"));
}

const ENV_PREFIX: &str = "DAYLIO_BRIDGE_";

fn fallback_dotenv_path(bridge_home: Option<PathBuf>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(custom) = bridge_home {
        return Some(custom.join(".env"));
    }
    Some(home_dir?.join(".daylio-bridge/.env"))
}

pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let fallback = fallback_dotenv_path(
        env::var_os("DAYLIO_BRIDGE_HOME").map(PathBuf::from),
        dirs::home_dir(),
    );

    let Some(path) = fallback else {
        return;
    };
    if path.is_file() {
        let _ = dotenvy::from_path(&path);
    }
}

fn unknown_keys<'a>(keys: impl Iterator<Item = &'a str>, allowlist: &[&str]) -> Vec<String> {
    let mut out = keys
        .filter(|key| key.starts_with(ENV_PREFIX))
        .filter(|key| !allowlist.contains(key))
        .map(ToOwned::to_owned)
        .collect::<Vec<_>>();
    out.sort();
    out
}

/// Log every `DAYLIO_BRIDGE_*` variable that no code path reads, which is
/// almost always a typo.
pub fn warn_unknown_env_keys() {
    let present = env::vars().map(|(key, _)| key).collect::<Vec<_>>();
    for key in unknown_keys(
        present.iter().map(String::as_str),
        generated::GENERATED_ENV_ALLOWLIST,
    ) {
        tracing::warn!(key = %key, "ignoring unrecognized environment variable");
    }
}
