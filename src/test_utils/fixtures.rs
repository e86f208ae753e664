//! On-disk fixtures shaped like the vendor's bundles.
//!
//! These write the minimal trees the layout writer expects to find after a
//! bundle unpacks: launchers under `scripts`, a `theme` directory, the git
//! library, and a config file for the client; a token payload for the
//! server; the runtime skeleton the tarball would leave under the base
//! directory.

use std::fs;
use std::path::Path;

use crate::constants::{
    CLIENT_GIT_LIBRARY, LAUNCHERS, RUNTIME_DIR_TOKEN, RUNTIME_SETUP_LAUNCHER,
};

/// A vendor page body carrying `token` where the version scraper looks.
#[must_use]
pub fn version_page(token: &str) -> String {
    format!("<p>Version: latest</p>\n  <span>{token}</span>\n")
}

/// Writes a staged client tree at `dir`, as the client ZIP would unpack it.
pub fn write_staged_client(dir: &Path) -> std::io::Result<()> {
    let scripts = dir.join("scripts");
    fs::create_dir_all(&scripts)?;
    for &name in LAUNCHERS {
        fs::write(scripts.join(name), format!("#!/bin/sh\nexec {name} \"$@\"\n"))?;
    }
    fs::write(
        scripts.join(RUNTIME_SETUP_LAUNCHER),
        format!("#!/bin/sh\nMONO_ROOT={RUNTIME_DIR_TOKEN}\nexport MONO_ROOT\n"),
    )?;
    fs::write(scripts.join("sample.conf"), "[client]\nlanguage = en\n")?;

    fs::create_dir_all(dir.join("theme"))?;
    fs::write(dir.join("theme").join("style.css"), "body {}\n")?;

    fs::create_dir_all(dir.join("gitlibs"))?;
    fs::write(dir.join("gitlibs").join(CLIENT_GIT_LIBRARY), b"\x7fELF")?;

    fs::write(dir.join("plastic.dll"), "client payload")?;
    Ok(())
}

/// Writes a staged server tree at `dir`, as the server ZIP would unpack it.
pub fn write_staged_server(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join("plasticd.exe"), "server payload")?;
    fs::write(dir.join("db.conf"), "[db]\nprovider = sqlite\n")?;
    Ok(())
}

/// Writes the runtime skeleton at `base_dir`, as the runtime tarball would
/// leave it.
pub fn write_runtime_tree(base_dir: &Path) -> std::io::Result<()> {
    let runtime = base_dir.join("mono");
    fs::create_dir_all(runtime.join("bin"))?;
    fs::write(runtime.join("bin").join("cert-sync"), "#!/bin/sh\n")?;
    fs::create_dir_all(runtime.join("lib"))?;
    fs::create_dir_all(base_dir.join("certtools"))?;
    Ok(())
}
