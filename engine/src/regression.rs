//! Regression testing helpers.
//!
//! A scenario is run live through a `HeadlessRunner`, its state history is
//! written to JSON, reloaded, and every frame is rendered again from the
//! reloaded states. Frame hashes from both passes must match, which catches
//! nondeterministic rendering and lossy state serialization in one go. The
//! hashes can additionally be pinned against a golden file.
//!
//! The engine stays game-agnostic by requiring a caller-provided renderer
//! closure.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};

use crate::{GameLogic, HeadlessRunner};

/// Environment flag helper: accepts `1/true/yes/on` (case-insensitive).
pub fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// If set, regression tests may update golden files in-place.
pub fn update_goldens_enabled() -> bool {
    env_flag("WHEEL_UPDATE_GOLDENS")
}

pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[macro_export]
macro_rules! regression_golden_path {
    ($name:expr) => {{
        let base = $crate::regression::sanitize_filename($name);
        ::std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("goldens")
            .join(format!("{base}.json"))
    }};
}

pub fn rgba_sha256_hex(rgba: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rgba);
    let digest = hasher.finalize();
    hex::encode(digest)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrameHashGolden {
    pub version: u32,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub hash_alg: String,
    /// One hash per recorded state.
    pub hashes: Vec<String>,
}

impl FrameHashGolden {
    pub fn new(name: impl Into<String>, width: u32, height: u32, hashes: Vec<String>) -> Self {
        Self {
            version: 1,
            name: name.into(),
            width,
            height,
            hash_alg: "sha256".to_string(),
            hashes,
        }
    }
}

pub fn load_golden_json(path: impl AsRef<Path>) -> io::Result<FrameHashGolden> {
    let path = path.as_ref();
    let file = fs::File::open(path)?;
    let reader = io::BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("failed parsing golden json {}: {e}", path.display()),
        )
    })
}

pub fn save_golden_json(path: impl AsRef<Path>, golden: &FrameHashGolden) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, golden)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    writer.flush()?;
    Ok(())
}

pub fn assert_or_update_golden_hashes(
    path: impl AsRef<Path>,
    name: &str,
    width: u32,
    height: u32,
    hashes: Vec<String>,
    update: bool,
) -> io::Result<()> {
    let path = path.as_ref();
    let golden = FrameHashGolden::new(name, width, height, hashes);
    let exists = path.exists();

    if update || !exists {
        save_golden_json(path, &golden)?;
        if exists {
            eprintln!("updated golden: {}", path.display());
        } else {
            eprintln!("wrote golden: {}", path.display());
        }
        return Ok(());
    }

    let expected = load_golden_json(path)?;
    if expected.version != golden.version
        || expected.hash_alg != golden.hash_alg
        || expected.width != golden.width
        || expected.height != golden.height
    {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "golden metadata mismatch at {}:\nexpected: v{} alg={} {}x{}\nactual:   v{} alg={} {}x{}\n(hint: set WHEEL_UPDATE_GOLDENS=1 to rewrite)",
                path.display(),
                expected.version,
                expected.hash_alg,
                expected.width,
                expected.height,
                golden.version,
                golden.hash_alg,
                golden.width,
                golden.height
            ),
        ));
    }

    if expected.hashes.len() != golden.hashes.len() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!(
                "golden frame count mismatch at {}: expected {} hashes, got {}\n(hint: set WHEEL_UPDATE_GOLDENS=1 to rewrite)",
                path.display(),
                expected.hashes.len(),
                golden.hashes.len()
            ),
        ));
    }

    for (i, (a, b)) in expected.hashes.iter().zip(golden.hashes.iter()).enumerate() {
        if a != b {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!(
                    "golden mismatch at {} (frame {i}):\nexpected: {a}\nactual:   {b}\n(hint: set WHEEL_UPDATE_GOLDENS=1 to rewrite)",
                    path.display()
                ),
            ));
        }
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct RenderHashArtifacts {
    pub state_json: PathBuf,
    pub live_hashes: Vec<String>,
    pub replay_hashes: Vec<String>,
}

/// Runs a scenario live, saves its state history to JSON, reloads the history,
/// renders every frame from both the live and reloaded states, and asserts the
/// per-frame hashes match.
///
/// The caller drives the live run via `drive` and supplies a `render` function
/// that fills an RGBA frame for a given state.
pub fn record_then_replay_render_hashes<G, Drive, Render>(
    name: &str,
    out_dir: impl AsRef<Path>,
    game: G,
    drive: Drive,
    width: u32,
    height: u32,
    mut render: Render,
) -> io::Result<RenderHashArtifacts>
where
    G: GameLogic + Clone,
    G::State: Serialize + DeserializeOwned,
    Drive: FnOnce(&mut HeadlessRunner<G>),
    Render: FnMut(&G::State, &mut [u8], u32, u32),
{
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)?;
    let state_json = out_dir.join(format!("{}.json", sanitize_filename(name)));

    let mut buf = vec![0u8; (width as usize) * (height as usize) * 4];

    // Live pass.
    let mut live_runner = HeadlessRunner::new(game.clone());
    drive(&mut live_runner);
    let live_hashes = hash_states(live_runner.history(), &mut buf, width, height, &mut render);

    {
        let file = fs::File::create(&state_json)?;
        let writer = io::BufWriter::new(file);
        serde_json::to_writer(writer, live_runner.history())
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    }

    // Replay pass from the reloaded history.
    let states: Vec<G::State> = {
        let file = fs::File::open(&state_json)?;
        let reader = io::BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed parsing state history {}: {e}", state_json.display()),
            )
        })?
    };
    let replay_runner = HeadlessRunner::from_history(game, states);
    let replay_hashes = hash_states(replay_runner.history(), &mut buf, width, height, &mut render);

    if live_hashes != replay_hashes {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("live/replay render hashes differ for scenario {name}"),
        ));
    }

    Ok(RenderHashArtifacts {
        state_json,
        live_hashes,
        replay_hashes,
    })
}

fn hash_states<S, Render>(
    states: &[S],
    buf: &mut [u8],
    width: u32,
    height: u32,
    render: &mut Render,
) -> Vec<String>
where
    Render: FnMut(&S, &mut [u8], u32, u32),
{
    states
        .iter()
        .map(|state| {
            buf.fill(0);
            render(state, buf, width, height);
            rgba_sha256_hex(buf)
        })
        .collect()
}
