//! Command line arguments.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

pub const USAGE: &str = "Usage: pulse-dash [payload.json|audio_data.js] [--windowed|-w] [--config <path>]

Without a payload argument, site/audio_data.js then audio_data.json are tried.";

/// Payload files looked up when none is given
const DEFAULT_PAYLOADS: [&str; 2] = ["site/audio_data.js", "audio_data.json"];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub payload: Option<PathBuf>,
    pub windowed: bool,
    pub config: Option<PathBuf>,
    pub help: bool,
}

impl Args {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut parsed = Args::default();
        let mut iter = args.into_iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--windowed" | "-w" => parsed.windowed = true,
                "--help" | "-h" => parsed.help = true,
                "--config" => match iter.next() {
                    Some(path) => parsed.config = Some(PathBuf::from(path)),
                    None => bail!("--config needs a path"),
                },
                flag if flag.starts_with('-') => bail!("unknown option {}", flag),
                path => {
                    if parsed.payload.is_some() {
                        bail!("only one payload file can be given");
                    }
                    parsed.payload = Some(PathBuf::from(path));
                }
            }
        }
        Ok(parsed)
    }

    /// The explicit payload, or the first default file present under `dir`
    pub fn payload_path(&self, dir: &Path) -> Option<PathBuf> {
        if let Some(path) = &self.payload {
            return Some(path.clone());
        }
        DEFAULT_PAYLOADS
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(args: &[&str]) -> Result<Args> {
        Args::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_flags() {
        let args = parse(&["track.json", "-w", "--config", "/tmp/pd.toml"]).unwrap();
        assert_eq!(args.payload, Some(PathBuf::from("track.json")));
        assert!(args.windowed);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/pd.toml")));
        assert!(!args.help);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&["--config"]).is_err());
        assert!(parse(&["--fullscreen"]).is_err());
        assert!(parse(&["a.json", "b.json"]).is_err());
    }

    #[test]
    fn test_default_payload_lookup() {
        let dir = std::env::temp_dir().join(format!("pulse-dash-args-{}", std::process::id()));
        fs::create_dir_all(dir.join("site")).unwrap();
        let args = Args::default();

        assert_eq!(args.payload_path(&dir), None);
        fs::write(dir.join("audio_data.json"), "{}").unwrap();
        assert_eq!(args.payload_path(&dir), Some(dir.join("audio_data.json")));
        fs::write(dir.join("site/audio_data.js"), "const audioData = {};").unwrap();
        assert_eq!(args.payload_path(&dir), Some(dir.join("site/audio_data.js")));

        fs::remove_dir_all(&dir).unwrap();
    }
}
