//! Mean adsorption (residence) times per (particle species, surface material).
//!
//! Entries are installed at configuration time, either directly or through the
//! `"<particleZ>;<materialZ>;<timeNs>"` command, and are read-only while
//! particles are being tracked.

use crate::core::units::{ns_to_s, s_to_ns};
use crate::error::{Error, Result};
use ordered_float::NotNan;
use std::collections::HashMap;
use std::fmt;

/// Field delimiter of adsorption-time commands.
pub const COMMAND_DELIMITER: char = ';';

/// Table key: the (particle, material) atomic number pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdsorptionKey {
    pub particle_z: u32,
    pub material_z: u32,
}

impl AdsorptionKey {
    #[inline]
    pub fn new(particle_z: u32, material_z: u32) -> Self {
        Self {
            particle_z,
            material_z,
        }
    }
}

impl fmt::Display for AdsorptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(Z={} on Z={})", self.particle_z, self.material_z)
    }
}

/// Why a command was accepted without installing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The command string was empty (or whitespace only).
    Empty,
    /// Fewer than three fields; carries the number found.
    TooFewFields(usize),
}

/// Result of loading one adsorption-time command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadOutcome {
    /// An entry was written. `previous` is the overwritten mean time [s], if any.
    Installed {
        key: AdsorptionKey,
        previous: Option<f64>,
    },
    /// Nothing changed.
    Ignored(IgnoreReason),
}

impl LoadOutcome {
    #[inline]
    pub fn is_installed(&self) -> bool {
        matches!(self, LoadOutcome::Installed { .. })
    }
}

/// A parsed `"<particleZ>;<materialZ>;<timeNs>"` command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsorptionCommand {
    pub key: AdsorptionKey,
    /// Mean residence time in nanoseconds, as written in the command.
    pub time_ns: f64,
}

impl AdsorptionCommand {
    /// Parse a command string.
    ///
    /// Returns `Ok(Err(reason))` for commands that are silently skipped (empty,
    /// fewer than three fields) and `Err(Error::Parse)` when a field is not a
    /// number. Fields past the third are ignored; one trailing delimiter is
    /// tolerated.
    pub fn parse(s: &str) -> Result<std::result::Result<Self, IgnoreReason>> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Err(IgnoreReason::Empty));
        }
        let mut tokens: Vec<&str> = s.split(COMMAND_DELIMITER).map(str::trim).collect();
        if tokens.last().is_some_and(|t| t.is_empty()) {
            tokens.pop();
        }
        if tokens.len() < 3 {
            return Ok(Err(IgnoreReason::TooFewFields(tokens.len())));
        }

        let particle_z = parse_field::<u32>("particle_z", tokens[0])?;
        let material_z = parse_field::<u32>("material_z", tokens[1])?;
        let time_ns = parse_field::<f64>("time_ns", tokens[2])?;

        Ok(Ok(Self {
            key: AdsorptionKey::new(particle_z, material_z),
            time_ns,
        }))
    }
}

fn parse_field<T>(field: &'static str, token: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    token.parse::<T>().map_err(|e| Error::Parse {
        field,
        token: token.to_string(),
        source: Box::new(e),
    })
}

/// Mapping (particle Z, material Z) → mean residence time [s].
#[derive(Debug, Clone, Default)]
pub struct AdsorptionTimeTable {
    entries: HashMap<AdsorptionKey, NotNan<f64>>,
}

impl AdsorptionTimeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or overwrite the mean residence time for `key`, in seconds.
    ///
    /// Returns the previous value. Zero is allowed and disables adsorption for
    /// the pair.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `seconds` is negative, NaN or infinite.
    pub fn insert(&mut self, key: AdsorptionKey, seconds: f64) -> Result<Option<f64>> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(Error::InvalidParam(format!(
                "adsorption time for {key} must be finite and >= 0, got {seconds} s"
            )));
        }
        let value = NotNan::new(seconds)
            .map_err(|_| Error::InvalidParam("adsorption time cannot be NaN".into()))?;
        let previous = self.entries.insert(key, value).map(NotNan::into_inner);
        if let Some(old) = previous {
            log::info!(
                "adsorption time {key}: previous {} ns, new {} ns",
                s_to_ns(old),
                s_to_ns(seconds)
            );
        } else {
            log::info!("adsorption time {key}: new {} ns", s_to_ns(seconds));
        }
        Ok(previous)
    }

    /// Install or overwrite an entry given in nanoseconds.
    pub fn insert_ns(&mut self, key: AdsorptionKey, nanoseconds: f64) -> Result<Option<f64>> {
        self.insert(key, ns_to_s(nanoseconds))
    }

    /// Apply one `"<particleZ>;<materialZ>;<timeNs>"` command.
    pub fn load(&mut self, command: &str) -> Result<LoadOutcome> {
        match AdsorptionCommand::parse(command)? {
            Ok(cmd) => {
                let previous = self.insert_ns(cmd.key, cmd.time_ns)?;
                Ok(LoadOutcome::Installed {
                    key: cmd.key,
                    previous,
                })
            }
            Err(reason) => {
                log::warn!("ignoring adsorption-time command {command:?}: {reason:?}");
                Ok(LoadOutcome::Ignored(reason))
            }
        }
    }

    /// Apply one command per line. Blank lines and `#` comments are skipped.
    ///
    /// Returns the number of entries written. Stops at the first parse error;
    /// lines before it stay applied.
    pub fn load_lines(&mut self, text: &str) -> Result<usize> {
        let mut installed = 0usize;
        for line in text.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            if self.load(line)?.is_installed() {
                installed += 1;
            }
        }
        Ok(installed)
    }

    /// Mean residence time [s] for `key`, if configured.
    #[inline]
    pub fn get(&self, key: AdsorptionKey) -> Option<f64> {
        self.entries.get(&key).map(|v| v.into_inner())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by key.
    pub fn entries(&self) -> Vec<(AdsorptionKey, f64)> {
        let mut out: Vec<(AdsorptionKey, f64)> = self
            .entries
            .iter()
            .map(|(k, v)| (*k, v.into_inner()))
            .collect();
        out.sort_by_key(|(k, _)| *k);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_command() -> Result<()> {
        let cmd = AdsorptionCommand::parse(" 55 ; 73 ; 12.5 ")?.expect("three fields");
        assert_eq!(cmd.key, AdsorptionKey::new(55, 73));
        assert_eq!(cmd.time_ns, 12.5);
        Ok(())
    }

    #[test]
    fn parse_skips_short_commands() -> Result<()> {
        assert_eq!(AdsorptionCommand::parse("")?, Err(IgnoreReason::Empty));
        assert_eq!(AdsorptionCommand::parse("   ")?, Err(IgnoreReason::Empty));
        assert_eq!(
            AdsorptionCommand::parse("6;14")?,
            Err(IgnoreReason::TooFewFields(2))
        );
        assert_eq!(
            AdsorptionCommand::parse("6;14;")?,
            Err(IgnoreReason::TooFewFields(2))
        );
        Ok(())
    }

    #[test]
    fn parse_extra_fields_ignored() -> Result<()> {
        let cmd = AdsorptionCommand::parse("6;14;120;extra")?.expect("three fields");
        assert_eq!(cmd.time_ns, 120.0);
        Ok(())
    }

    #[test]
    fn parse_reports_offending_field() {
        let err = AdsorptionCommand::parse("6;;120").unwrap_err();
        assert!(matches!(err, Error::Parse { field: "material_z", .. }));
        let err = AdsorptionCommand::parse("6;14;soon").unwrap_err();
        assert!(matches!(err, Error::Parse { field: "time_ns", .. }));
    }

    #[test]
    fn insert_returns_previous_and_keeps_one_entry() -> Result<()> {
        let mut t = AdsorptionTimeTable::new();
        let key = AdsorptionKey::new(55, 73);
        assert_eq!(t.insert(key, 1e-6)?, None);
        assert_eq!(t.insert(key, 2e-6)?, Some(1e-6));
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(key), Some(2e-6));
        Ok(())
    }

    #[test]
    fn negative_and_nan_times_rejected() {
        let mut t = AdsorptionTimeTable::new();
        let key = AdsorptionKey::new(1, 1);
        assert!(t.insert(key, -1.0).is_err());
        assert!(t.insert(key, f64::NAN).is_err());
        assert!(t.insert(key, f64::INFINITY).is_err());
        assert!(t.is_empty());
    }

    #[test]
    fn material_z_above_one_thousand_does_not_collide() -> Result<()> {
        let mut t = AdsorptionTimeTable::new();
        t.insert(AdsorptionKey::new(1, 1000), 1.0)?;
        t.insert(AdsorptionKey::new(2, 0), 2.0)?;
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(AdsorptionKey::new(1, 1000)), Some(1.0));
        Ok(())
    }

    #[test]
    fn load_lines_skips_comments() -> Result<()> {
        let mut t = AdsorptionTimeTable::new();
        let n = t.load_lines("# Cs on tantalum\n55;73;10\n\n55;6;20 # graphite\n6;14\n")?;
        assert_eq!(n, 2);
        assert_eq!(
            t.entries(),
            vec![
                (AdsorptionKey::new(55, 6), ns_to_s(20.0)),
                (AdsorptionKey::new(55, 73), ns_to_s(10.0)),
            ]
        );
        Ok(())
    }
}
